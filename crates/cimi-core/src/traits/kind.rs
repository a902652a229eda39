//! Resource-kind descriptor trait.

/// Describes one CIMI resource type to the generic client.
///
/// Implemented by zero-sized marker types (`System`, `Disk`, ...). Typed
/// accessors live as inherent methods on `ResourceHandle<Kind>`.
pub trait ResourceKind: Send + Sync + 'static {
    /// Human-readable type name used in errors and logs.
    const NAME: &'static str;

    /// Entry-point key of the top-level collection, if the type has one.
    /// Sub-collection types (machine disks, ...) have none.
    const COLLECTION: Option<&'static str>;

    /// Key of the member array inside a collection document.
    const ARRAY_KEY: &'static str;

    /// Type-specific attributes exposed through typed accessors.
    const ATTRIBUTES: &'static [&'static str] = &[];
}
