//! Service layer for LifeLedger
//!
//! The service layer provides business logic on top of the storage traits,
//! handling validation, computed fields, and cross-entity operations.

pub mod account;
pub mod aggregation;
pub mod bills;
pub mod category;
pub mod income;
pub mod notification;
pub mod range;
pub mod recurring;
pub mod scheduler;
pub mod security;
pub mod sync;
pub mod transaction;
pub mod view_state;

pub use account::AccountService;
pub use aggregation::{
    CategoryGroup, CategoryKey, CategorySlice, CurrencyTotals, DailyTotal, TransactionAggregator,
    TypeFilter, WeekdayTotal, UNCATEGORIZED_KEY,
};
pub use bills::{BillPaid, BillSaved, BillService};
pub use category::CategoryService;
pub use income::{IncomeHub, IncomeOverview, QuickIncome, QuickIncomeAdded};
pub use notification::{BillNotificationService, ProfileChange, ProfileSaved};
pub use range::RangeResolver;
pub use recurring::{RecurringProjector, RecurringSummary, UpcomingIncome};
pub use scheduler::{LocalReminderScheduler, NotificationScheduler, SyncReport};
pub use security::{SecurityService, SecurityStatus};
pub use sync::{ScheduleSync, SyncMode, SyncOutcome};
pub use transaction::{NewTransaction, TransactionService};
pub use view_state::{Liveness, LoadState};
