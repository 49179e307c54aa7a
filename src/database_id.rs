//! Primary key type definition.

/// Alias for the integer type used for mapping to primary keys.
///
/// Keys are assigned by a store on insertion and are always positive.
pub type PrimaryKey = i64;

/// The key of a record that has not been added to a store yet.
pub const UNSET_PK: PrimaryKey = 0;
