//! TUI widgets for Money Mayhem

pub mod input;
pub mod question;
pub mod wallet;

pub use input::InputWidget;
pub use question::QuestionWidget;
pub use wallet::WalletPanelWidget;
