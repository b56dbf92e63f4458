pub mod text_edit;
