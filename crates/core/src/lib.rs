pub mod job;
pub mod money;
pub mod period;
pub mod transaction;

pub use job::{JobRule, JobRuleSet, RuleError, UNCATEGORIZED};
pub use money::Money;
pub use period::DateRange;
pub use transaction::{Transaction, TransactionError, TxDate};
