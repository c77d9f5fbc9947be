//! Componentes de la interfaz

pub mod bancada_modal;
pub mod login_page;
pub mod oi_list_page;
pub mod oi_page;
pub mod password_modal;
pub mod spinner;
pub mod toast;
pub mod topbar;
