//! Patient screens: the master list and the detail/edit screen.

pub mod detail;
pub mod fields;
pub mod form;
pub mod list;

pub use detail::PatientDetail;
pub use list::PatientList;
