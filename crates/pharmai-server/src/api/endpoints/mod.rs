pub mod chat;
pub mod drugs;
pub mod health;
pub mod interaction;
pub mod ledger;
