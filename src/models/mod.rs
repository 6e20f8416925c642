pub mod ledger;
pub mod order;
pub mod product;
pub mod reference;
