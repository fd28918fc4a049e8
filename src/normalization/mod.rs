pub mod phone;
pub mod slug;
