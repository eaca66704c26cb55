mod eastmoney;
mod replay;

pub use eastmoney::EastmoneyAdapter;
pub use replay::ReplayAdapter;
