pub mod payout;
pub mod redeem;
