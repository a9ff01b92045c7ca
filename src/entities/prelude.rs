pub use super::admins::Entity as Admins;
pub use super::bookings::Entity as Bookings;
pub use super::owners::Entity as Owners;
pub use super::payments::Entity as Payments;
pub use super::rooms::Entity as Rooms;
pub use super::users::Entity as Users;
