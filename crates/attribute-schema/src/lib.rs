//! attribute-schema: declarative descriptors for appliance attributes
//!
//! An [`AttributeSchema`] describes one value a device reports or accepts: its key in
//! the raw telemetry, a display name, its type, and either the enum mapping or the
//! numeric range that bounds it. Schemas are validated when they are built, so a
//! schema in hand always satisfies the type/map/range invariant.

mod error;
pub use error::{ValidationError, ValueError};

mod types;
pub use types::{AttributeSchema, AttributeSpec, ReadWrite, TypeTag, ValueRange};

mod value;
pub use value::AttributeValue;
