pub mod bot;
pub mod exchange;
pub mod parameters;
pub mod routine;
pub mod trade;
pub mod user;

pub use bot::{Bot, BotStatus};
pub use exchange::{Exchange, ExchangeSummary};
pub use parameters::{
    BotParameters, ExchangeParameters, GridSummary, ModeOption, RiskModeOption, RoutineParameters,
    SymbolInfo,
};
pub use routine::{Routine, RoutineAction, RunRoutineResponse};
pub use trade::{PageLinks, PageMeta, Paginated, PnlRecord, PnlStatsResponse, Trade};
pub use user::User;
