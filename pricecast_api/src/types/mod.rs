mod price;
pub use self::price::PriceRecord;

mod dividend;
pub use self::dividend::DividendRecord;
