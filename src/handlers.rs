pub mod health;
pub mod redeem;
pub mod status;
pub mod treasury_bot;
