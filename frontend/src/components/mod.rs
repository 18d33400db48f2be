pub mod chat;
pub mod dialog;
pub mod document_list;
pub mod sidebar;
pub mod upload;
