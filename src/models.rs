//! Snapshot types returned by the bot's HTTP API
//!
//! Each type maps one endpoint's JSON body. Snapshots are transient: they are
//! fetched, rendered, and discarded every cycle. A snapshot is only consistent
//! within its own fetch - the balance and the open positions may come from
//! slightly different instants, and nothing here assumes otherwise.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Market regime classification from the ADX engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketState {
    Trending,
    Ranging,
    Building,
    /// Fallback the bot reports before the first indicator computation
    #[serde(other)]
    Unknown,
}

impl MarketState {
    pub fn label(&self) -> &'static str {
        match self {
            MarketState::Trending => "TRENDING",
            MarketState::Ranging => "RANGING",
            MarketState::Building => "BUILDING",
            MarketState::Unknown => "UNKNOWN",
        }
    }

    /// Presentation class, lower-cased from the state name
    pub fn class(&self) -> &'static str {
        match self {
            MarketState::Trending => "trending",
            MarketState::Ranging => "ranging",
            MarketState::Building => "building",
            MarketState::Unknown => "unknown",
        }
    }
}

/// Direction of an open position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }
}

/// Whether a trade was simulated or placed with real funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl TradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Paper => "paper",
            TradingMode::Live => "live",
        }
    }
}

/// Account balance and P&L figures inside the status snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummary {
    pub balance: f64,
    pub total_pnl: f64,
    pub total_return_percent: f64,
    pub unrealized_pnl: f64,
    #[serde(default)]
    pub equity: f64,
    #[serde(default)]
    pub margin_used: f64,
    #[serde(default)]
    pub peak_balance: f64,
}

/// One open position as reported by `/api/status`
#[derive(Debug, Clone, Deserialize)]
pub struct PositionView {
    pub side: PositionSide,
    pub entry_price: f64,
    pub current_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub unrealized_pnl: f64,
}

/// Complete bot status from `/api/status`
#[derive(Debug, Clone, Deserialize)]
pub struct BotStatusSnapshot {
    pub running: bool,
    pub account: AccountSummary,
    #[serde(default)]
    pub positions_count: usize,
    #[serde(default)]
    pub btc_price: f64,
    #[serde(default)]
    pub positions: Vec<PositionView>,
}

/// ADX indicator values from `/api/adx`
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorSnapshot {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub di_spread: f64,
    pub adx_slope: f64,
    /// Signal confidence, already scaled to 0-100
    pub confidence: f64,
    pub market_state: MarketState,
    #[serde(default)]
    pub trend_strength: String,
}

/// Aggregate trade statistics from `/api/performance`
#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceSnapshot {
    pub total_trades: u32,
    pub wins: u32,
    pub losses: u32,
    /// Win rate, already scaled to 0-100
    pub win_rate: f64,
    /// None when there are no losing trades to divide by
    pub profit_factor: Option<f64>,
    pub avg_pnl: f64,
    pub best_trade: f64,
    #[serde(default)]
    pub worst_trade: f64,
    #[serde(default)]
    pub total_pnl: f64,
}

/// Risk engine status from `/api/risk`
#[derive(Debug, Clone, Deserialize)]
pub struct RiskSnapshot {
    pub daily_pnl: f64,
    pub max_drawdown: f64,
    pub daily_loss_limit: f64,
    pub max_drawdown_limit: f64,
    pub consecutive_wins: u32,
    pub consecutive_losses: u32,
    pub circuit_breaker: bool,
    #[serde(default)]
    pub positions_open: u32,
    #[serde(default = "default_positions_max")]
    pub positions_max: u32,
    #[serde(default = "default_can_trade")]
    pub can_trade: bool,
}

fn default_positions_max() -> u32 {
    2
}

fn default_can_trade() -> bool {
    true
}

/// One closed trade from `/api/trades`
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRecord {
    pub side: String,
    #[serde(default)]
    pub trading_mode: TradingMode,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub exit_reason: String,
    /// Hold time in hours, as the trade ledger stores it
    pub hold_duration: f64,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Envelope around the trade list
#[derive(Debug, Clone, Deserialize)]
pub struct TradesResponse {
    pub trades: Vec<TradeRecord>,
}

/// Response of the `/health` probe
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}
