pub mod markdown;
pub mod site;
pub mod slug;
pub mod template;
pub mod tml;
pub mod validate;
