//! Core traits shared by the GSB models

/// Primary key type. GSB identifiers are opaque strings.
pub type Id = String;

/// Trait for records that have a server-assigned identifier
pub trait Identifiable {
    fn id(&self) -> Option<&str>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for records addressed by a unique name (entity definitions, enums)
pub trait Named {
    fn name(&self) -> &str;
}
