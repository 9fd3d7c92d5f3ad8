pub mod settings_tab;
pub mod translate_tab;
