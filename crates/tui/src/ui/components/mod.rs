pub mod hints;
pub mod tabs;
pub mod toast;
