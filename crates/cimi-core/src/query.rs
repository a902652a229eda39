//! Query parameters for CIMI read requests.

/// Token meaning "every attribute" inside `$select`.
pub const SELECT_ALL: &str = "*";

/// An immutable set of CIMI query parameters.
///
/// Covers attribute selection (`$select`), relation expansion (`$expand`),
/// provider-side filtering (`$filter`) and the `$first`/`$last` window.
///
/// # Example
///
/// ```
/// use cimi_core::QueryParams;
///
/// let params = QueryParams::builder()
///     .select("id, capacity,initialLocation")
///     .expand("machine")
///     .build();
/// assert!(params.is_selected("capacity"));
/// assert!(!params.is_selected("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    select: Option<Vec<String>>,
    expand: Option<Vec<String>>,
    filter: Option<String>,
    first: Option<u32>,
    last: Option<u32>,
}

impl QueryParams {
    /// Parameters that select everything and expand nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn builder() -> QueryParamsBuilder {
        QueryParamsBuilder::default()
    }

    /// Starts a builder pre-filled with these parameters.
    pub fn to_builder(&self) -> QueryParamsBuilder {
        QueryParamsBuilder {
            params: self.clone(),
        }
    }

    pub fn select(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    pub fn expand(&self) -> Option<&[String]> {
        self.expand.as_deref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn first(&self) -> Option<u32> {
        self.first
    }

    pub fn last(&self) -> Option<u32> {
        self.last
    }

    /// Returns true if `attribute` is part of the selection.
    ///
    /// An unset selection, or one containing `*`, selects every attribute.
    /// This decides what gets displayed, independently of what was fetched.
    pub fn is_selected(&self, attribute: &str) -> bool {
        match &self.select {
            None => true,
            Some(attrs) => attrs.iter().any(|a| a == SELECT_ALL || a == attribute),
        }
    }

    /// Counts how many of `attributes` are selected.
    pub fn count_selected(&self, attributes: &[&str]) -> usize {
        attributes.iter().filter(|a| self.is_selected(a)).count()
    }

    /// Field-wise override: every field set in `other` replaces the same
    /// field here. Selections are replaced, never merged.
    pub fn overridden_by(&self, other: &QueryParams) -> QueryParams {
        QueryParams {
            select: other.select.clone().or_else(|| self.select.clone()),
            expand: other.expand.clone().or_else(|| self.expand.clone()),
            filter: other.filter.clone().or_else(|| self.filter.clone()),
            first: other.first.or(self.first),
            last: other.last.or(self.last),
        }
    }

    /// The parameters to send for collection reads: a selection naming
    /// neither `*` nor `id` gets `id` added, so every member stays
    /// addressable. Display keeps following the caller's selection.
    pub(crate) fn keeping_id(&self) -> QueryParams {
        let mut params = self.clone();
        if let Some(select) = params.select.as_mut() {
            if !select.iter().any(|a| a == SELECT_ALL || a == "id") {
                select.push("id".to_string());
            }
        }
        params
    }

    /// Returns true when no parameter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Encodes the set fields as CIMI query pairs.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(select) = &self.select {
            pairs.push(("$select", select.join(",")));
        }
        if let Some(expand) = &self.expand {
            pairs.push(("$expand", expand.join(",")));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        if let Some(first) = self.first {
            pairs.push(("$first", first.to_string()));
        }
        if let Some(last) = self.last {
            pairs.push(("$last", last.to_string()));
        }
        pairs
    }
}

/// Builder for [`QueryParams`].
#[derive(Debug, Clone, Default)]
pub struct QueryParamsBuilder {
    params: QueryParams,
}

impl QueryParamsBuilder {
    /// Restricts returned attributes. Accepts a comma-separated list;
    /// an empty list clears the selection.
    pub fn select(mut self, attributes: &str) -> Self {
        self.params.select = split_list(attributes);
        self
    }

    /// Like [`select`](Self::select), from separate attribute names.
    pub fn select_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = attributes
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .collect();
        self.params.select = split_list(&joined.join(","));
        self
    }

    /// Forces eager fetch of the named relations (comma-separated).
    pub fn expand(mut self, relations: &str) -> Self {
        self.params.expand = split_list(relations);
        self
    }

    /// Provider-side predicate, e.g. `name='web'`.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.params.filter = (!filter.trim().is_empty()).then_some(filter);
        self
    }

    pub fn first(mut self, first: u32) -> Self {
        self.params.first = Some(first);
        self
    }

    pub fn last(mut self, last: u32) -> Self {
        self.params.last = Some(last);
        self
    }

    pub fn build(self) -> QueryParams {
        self.params
    }
}

fn split_list(s: &str) -> Option<Vec<String>> {
    let mut items: Vec<String> = Vec::new();
    for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    (!items.is_empty()).then_some(items)
}
