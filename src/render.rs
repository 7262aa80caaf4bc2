//! Section renderers over an abstract render target
//!
//! Renderers are pure mappings from one decoded snapshot to mutations on a
//! [`Surface`]. The surface abstraction replaces the string-keyed element
//! lookups of the original UI: renderers only know the capabilities
//! "set text", "set width", "toggle class", and "replace card list", which
//! keeps every rendering rule unit-testable without a live front-end.
//!
//! Each renderer owns a disjoint set of targets, so renderers never conflict
//! within a refresh cycle.

use crate::format::{
    format_currency, format_hold_time, format_percent, format_timestamp, value_class,
};
use crate::models::{
    BotStatusSnapshot, IndicatorSnapshot, PerformanceSnapshot, PositionView, RiskSnapshot,
    TradesResponse,
};

/// Render target identifiers (the dashboard's element contract)
pub mod targets {
    pub const STATUS_DOT: &str = "statusDot";
    pub const STATUS_TEXT: &str = "statusText";
    pub const BALANCE: &str = "balance";
    pub const BALANCE_CHANGE: &str = "balanceChange";
    pub const TOTAL_PNL: &str = "totalPnl";
    pub const TOTAL_RETURN: &str = "totalReturn";
    pub const UNREALIZED_PNL: &str = "unrealizedPnl";
    pub const POSITIONS_COUNT: &str = "positionsCount";
    pub const BTC_PRICE: &str = "btcPrice";
    pub const POSITIONS_LIST: &str = "positionsList";

    pub const ADX_VALUE: &str = "adxValue";
    pub const ADX_BAR: &str = "adxBar";
    pub const PLUS_DI: &str = "plusDi";
    pub const MINUS_DI: &str = "minusDi";
    pub const DI_SPREAD: &str = "diSpread";
    pub const ADX_SLOPE: &str = "adxSlope";
    pub const CONFIDENCE: &str = "confidence";
    pub const MARKET_STATE: &str = "marketState";

    pub const TOTAL_TRADES: &str = "totalTrades";
    pub const WINS: &str = "wins";
    pub const LOSSES: &str = "losses";
    pub const WIN_RATE: &str = "winRate";
    pub const PROFIT_FACTOR: &str = "profitFactor";
    pub const AVG_PNL: &str = "avgPnl";
    pub const BEST_TRADE: &str = "bestTrade";

    pub const DAILY_PNL: &str = "dailyPnl";
    pub const DAILY_PNL_BAR: &str = "dailyPnlBar";
    pub const MAX_DRAWDOWN: &str = "maxDrawdown";
    pub const DRAWDOWN_BAR: &str = "drawdownBar";
    pub const CONSECUTIVE_WINS: &str = "consecutiveWins";
    pub const CONSECUTIVE_LOSSES: &str = "consecutiveLosses";
    pub const CIRCUIT_BREAKER: &str = "circuitBreaker";

    pub const TRADES_LIST: &str = "tradesList";
    pub const COUNTDOWN: &str = "countdown";
    pub const LAST_UPDATE: &str = "lastUpdate";
}

/// One line of a card, optionally carrying a presentation class
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub class: Option<&'static str>,
}

/// A card in a list container (one trade, one position, or an empty state)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub lines: Vec<Line>,
}

impl Card {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(Line {
            text: text.into(),
            class: None,
        });
        self
    }

    pub fn classed(mut self, text: impl Into<String>, class: &'static str) -> Self {
        self.lines.push(Line {
            text: text.into(),
            class: Some(class),
        });
        self
    }
}

/// Capability interface the renderers draw through
///
/// Implementations own target resolution; an unknown id is simply retained or
/// ignored rather than being a hard failure.
pub trait Surface {
    /// Set the text content of a target
    fn set_text(&mut self, id: &str, text: &str);
    /// Set or clear the presentation class of a target
    fn set_class(&mut self, id: &str, class: Option<&'static str>);
    /// Set a progress-bar style width, as a 0-100 percentage
    fn set_width(&mut self, id: &str, percent: f64);
    /// Replace the card list of a container target
    fn set_cards(&mut self, id: &str, cards: Vec<Card>);
    /// Value of the optional trading-mode filter control, when present
    fn trade_filter(&self) -> Option<String> {
        None
    }
    /// Flush pending mutations to the viewer (no-op for in-memory targets)
    fn present(&mut self) {}
}

/// Render the bot status section, including the open position list
///
/// The balance change is measured against `initial_capital`, a display
/// constant that is deliberately not sourced from the API.
pub fn render_status(
    surface: &mut impl Surface,
    snap: &BotStatusSnapshot,
    initial_capital: f64,
    max_positions: u32,
) {
    if snap.running {
        surface.set_text(targets::STATUS_TEXT, "LIVE");
        surface.set_class(targets::STATUS_DOT, Some("online"));
    } else {
        surface.set_text(targets::STATUS_TEXT, "OFFLINE");
        surface.set_class(targets::STATUS_DOT, Some("offline"));
    }

    surface.set_text(targets::BALANCE, &format!("${:.2}", snap.account.balance));

    let change = snap.account.balance - initial_capital;
    surface.set_text(targets::BALANCE_CHANGE, &format_currency(change));
    surface.set_class(targets::BALANCE_CHANGE, value_class(change));

    surface.set_text(targets::TOTAL_PNL, &format_currency(snap.account.total_pnl));
    surface.set_class(targets::TOTAL_PNL, value_class(snap.account.total_pnl));

    surface.set_text(
        targets::TOTAL_RETURN,
        &format_percent(snap.account.total_return_percent),
    );
    surface.set_class(
        targets::TOTAL_RETURN,
        value_class(snap.account.total_return_percent),
    );

    surface.set_text(
        targets::UNREALIZED_PNL,
        &format_currency(snap.account.unrealized_pnl),
    );
    surface.set_class(
        targets::UNREALIZED_PNL,
        value_class(snap.account.unrealized_pnl),
    );

    surface.set_text(
        targets::POSITIONS_COUNT,
        &format!("{}/{}", snap.positions_count, max_positions),
    );
    surface.set_text(targets::BTC_PRICE, &format!("${:.2}", snap.btc_price));

    render_positions(surface, &snap.positions);
}

/// Render the open position cards (invoked from the status renderer)
pub fn render_positions(surface: &mut impl Surface, positions: &[PositionView]) {
    if positions.is_empty() {
        surface.set_cards(
            targets::POSITIONS_LIST,
            vec![Card::new().line("No open positions")],
        );
        return;
    }

    let cards = positions
        .iter()
        .map(|pos| {
            let side_class = match pos.side {
                crate::models::PositionSide::Long => "long",
                crate::models::PositionSide::Short => "short",
            };
            let card = Card::new().classed(pos.side.as_str(), side_class);
            let pnl_text = format!("Unrealized: {}", format_currency(pos.unrealized_pnl));
            let card = match value_class(pos.unrealized_pnl) {
                Some(class) => card.classed(pnl_text, class),
                None => card.line(pnl_text),
            };
            card.line(format!(
                    "Entry ${:.2} -> Now ${:.2}",
                    pos.entry_price, pos.current_price
                ))
                .line(format!(
                    "SL ${:.2} / TP ${:.2}",
                    pos.stop_loss, pos.take_profit
                ))
        })
        .collect();

    surface.set_cards(targets::POSITIONS_LIST, cards);
}

/// Width of the ADX strength bar: linear up to ADX 50, clamped at 100%
pub fn adx_bar_width(adx: f64) -> f64 {
    (adx / 50.0 * 100.0).min(100.0)
}

/// Render the ADX indicator section
pub fn render_indicators(surface: &mut impl Surface, snap: &IndicatorSnapshot) {
    surface.set_text(targets::ADX_VALUE, &format!("{:.2}", snap.adx));
    // 25 is the trend threshold the strategy trades on
    let class = if snap.adx >= 25.0 {
        Some("positive")
    } else {
        None
    };
    surface.set_class(targets::ADX_VALUE, class);
    surface.set_width(targets::ADX_BAR, adx_bar_width(snap.adx));

    surface.set_text(targets::PLUS_DI, &format!("{:.2}", snap.plus_di));
    surface.set_text(targets::MINUS_DI, &format!("{:.2}", snap.minus_di));
    surface.set_text(targets::DI_SPREAD, &format!("{:.2}", snap.di_spread));
    surface.set_text(targets::ADX_SLOPE, &format!("{:.2}", snap.adx_slope));
    surface.set_text(targets::CONFIDENCE, &format!("{:.1}%", snap.confidence));

    surface.set_text(targets::MARKET_STATE, snap.market_state.label());
    surface.set_class(targets::MARKET_STATE, Some(snap.market_state.class()));
}

/// Render the performance statistics section
pub fn render_performance(surface: &mut impl Surface, snap: &PerformanceSnapshot) {
    surface.set_text(targets::TOTAL_TRADES, &snap.total_trades.to_string());
    surface.set_text(targets::WINS, &snap.wins.to_string());
    surface.set_text(targets::LOSSES, &snap.losses.to_string());

    surface.set_text(targets::WIN_RATE, &format!("{:.2}%", snap.win_rate));
    let class = if snap.win_rate >= 50.0 {
        Some("positive")
    } else {
        None
    };
    surface.set_class(targets::WIN_RATE, class);

    let pf_text = match snap.profit_factor {
        Some(pf) if pf != 0.0 => format!("{pf:.2}"),
        _ => "N/A".to_string(),
    };
    surface.set_text(targets::PROFIT_FACTOR, &pf_text);

    surface.set_text(targets::AVG_PNL, &format_currency(snap.avg_pnl));
    surface.set_class(targets::AVG_PNL, value_class(snap.avg_pnl));
    surface.set_text(targets::BEST_TRADE, &format_currency(snap.best_trade));
    surface.set_class(targets::BEST_TRADE, value_class(snap.best_trade));
}

/// Threshold class for a risk progress bar
///
/// The raw (unclamped) ratio drives the class even when the displayed width
/// is capped at 100. Danger applies only to bars flagged danger-eligible;
/// anything over 50 is at least a warning.
pub fn risk_bar_class(ratio: f64, danger_eligible: bool) -> Option<&'static str> {
    if danger_eligible && ratio > 80.0 {
        Some("danger")
    } else if ratio > 50.0 {
        Some("warning")
    } else {
        None
    }
}

/// Render the risk limits section
pub fn render_risk(surface: &mut impl Surface, snap: &RiskSnapshot) {
    surface.set_text(targets::DAILY_PNL, &format_currency(snap.daily_pnl));
    surface.set_class(targets::DAILY_PNL, value_class(snap.daily_pnl));

    let daily_ratio = if snap.daily_loss_limit != 0.0 {
        (snap.daily_pnl / snap.daily_loss_limit).abs() * 100.0
    } else {
        0.0
    };
    surface.set_width(targets::DAILY_PNL_BAR, daily_ratio.min(100.0));
    // The daily bar only signals danger while the day is actually negative
    surface.set_class(
        targets::DAILY_PNL_BAR,
        risk_bar_class(daily_ratio, snap.daily_pnl < 0.0),
    );

    surface.set_text(targets::MAX_DRAWDOWN, &format!("{:.2}%", snap.max_drawdown));

    let dd_ratio = if snap.max_drawdown_limit != 0.0 {
        snap.max_drawdown / snap.max_drawdown_limit * 100.0
    } else {
        0.0
    };
    surface.set_width(targets::DRAWDOWN_BAR, dd_ratio.min(100.0));
    surface.set_class(targets::DRAWDOWN_BAR, risk_bar_class(dd_ratio, true));

    surface.set_text(
        targets::CONSECUTIVE_WINS,
        &snap.consecutive_wins.to_string(),
    );
    surface.set_text(
        targets::CONSECUTIVE_LOSSES,
        &snap.consecutive_losses.to_string(),
    );

    if snap.circuit_breaker {
        surface.set_text(targets::CIRCUIT_BREAKER, "ACTIVE");
        surface.set_class(targets::CIRCUIT_BREAKER, Some("danger"));
    } else {
        surface.set_text(targets::CIRCUIT_BREAKER, "OK");
        surface.set_class(targets::CIRCUIT_BREAKER, Some("positive"));
    }
}

/// Render the recent trade cards
///
/// `filter` is the trading-mode filter that was active for the fetch; the
/// empty state names it so the viewer can tell "no trades" from "no live
/// trades".
pub fn render_trades(surface: &mut impl Surface, resp: &TradesResponse, filter: Option<&str>) {
    if resp.trades.is_empty() {
        let text = match filter {
            Some(mode) => format!("No {mode} trades yet"),
            None => "No trades yet".to_string(),
        };
        surface.set_cards(targets::TRADES_LIST, vec![Card::new().line(text)]);
        return;
    }

    let cards = resp
        .trades
        .iter()
        .map(|trade| {
            let result_class = if trade.pnl >= 0.0 { "win" } else { "loss" };
            Card::new()
                .line(format!("{} [{}]", trade.side, trade.trading_mode.as_str()))
                .classed(
                    format!(
                        "{} ({})",
                        format_currency(trade.pnl),
                        format_percent(trade.pnl_percent)
                    ),
                    result_class,
                )
                .line(format!(
                    "${:.2} -> ${:.2}",
                    trade.entry_price, trade.exit_price
                ))
                .line(format!(
                    "{} | held {}",
                    trade.exit_reason,
                    // The ledger stores hold time in hours
                    format_hold_time(trade.hold_duration * 3600.0)
                ))
                .line(format_timestamp(trade.closed_at))
        })
        .collect();

    surface.set_cards(targets::TRADES_LIST, cards);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountSummary, MarketState, PositionSide, TradeRecord, TradingMode};
    use crate::term::TermSurface;

    fn account(balance: f64) -> AccountSummary {
        AccountSummary {
            balance,
            total_pnl: balance - 160.0,
            total_return_percent: 0.0,
            unrealized_pnl: 0.0,
            equity: 0.0,
            margin_used: 0.0,
            peak_balance: 0.0,
        }
    }

    #[test]
    fn test_status_live_and_balance_change() {
        let mut surface = TermSurface::new();
        let snap = BotStatusSnapshot {
            running: true,
            account: account(172.4),
            positions_count: 1,
            btc_price: 107907.8,
            positions: vec![],
        };

        render_status(&mut surface, &snap, 160.0, 2);

        assert_eq!(surface.text(targets::STATUS_TEXT), Some("LIVE"));
        assert_eq!(surface.class(targets::STATUS_DOT), Some("online"));
        assert_eq!(surface.text(targets::BALANCE), Some("$172.40"));
        assert_eq!(surface.text(targets::BALANCE_CHANGE), Some("+$12.40"));
        assert_eq!(surface.class(targets::BALANCE_CHANGE), Some("positive"));
        assert_eq!(surface.text(targets::POSITIONS_COUNT), Some("1/2"));
        // Empty position list renders the placeholder card
        let cards = surface.cards(targets::POSITIONS_LIST).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].lines[0].text, "No open positions");
    }

    #[test]
    fn test_status_offline_negative_change() {
        let mut surface = TermSurface::new();
        let snap = BotStatusSnapshot {
            running: false,
            account: account(150.0),
            positions_count: 0,
            btc_price: 0.0,
            positions: vec![],
        };

        render_status(&mut surface, &snap, 160.0, 2);

        assert_eq!(surface.text(targets::STATUS_TEXT), Some("OFFLINE"));
        assert_eq!(surface.class(targets::STATUS_DOT), Some("offline"));
        // The currency quirk: negative change shows magnitude only
        assert_eq!(surface.text(targets::BALANCE_CHANGE), Some("$10.00"));
        assert_eq!(surface.class(targets::BALANCE_CHANGE), Some("negative"));
    }

    #[test]
    fn test_position_cards() {
        let mut surface = TermSurface::new();
        let positions = vec![PositionView {
            side: PositionSide::Short,
            entry_price: 108000.0,
            current_price: 107500.0,
            stop_loss: 109100.0,
            take_profit: 105800.0,
            unrealized_pnl: 1.6,
        }];

        render_positions(&mut surface, &positions);

        let cards = surface.cards(targets::POSITIONS_LIST).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].lines[0].text, "SHORT");
        assert_eq!(cards[0].lines[0].class, Some("short"));
        assert_eq!(cards[0].lines[1].text, "Unrealized: +$1.60");
        assert_eq!(cards[0].lines[1].class, Some("positive"));
    }

    #[test]
    fn test_adx_bar_clamps_at_50() {
        assert_eq!(adx_bar_width(50.0), 100.0);
        assert_eq!(adx_bar_width(72.0), 100.0);
        assert_eq!(adx_bar_width(25.0), 50.0);
        assert_eq!(adx_bar_width(0.0), 0.0);
    }

    #[test]
    fn test_indicator_threshold_class() {
        let mut surface = TermSurface::new();
        let mut snap = IndicatorSnapshot {
            adx: 31.2,
            plus_di: 28.0,
            minus_di: 12.5,
            di_spread: 15.5,
            adx_slope: 0.8,
            confidence: 82.5,
            market_state: MarketState::Trending,
            trend_strength: String::new(),
        };

        render_indicators(&mut surface, &snap);
        assert_eq!(surface.text(targets::ADX_VALUE), Some("31.20"));
        assert_eq!(surface.class(targets::ADX_VALUE), Some("positive"));
        assert!((surface.width(targets::ADX_BAR).unwrap() - 62.4).abs() < 1e-9);
        assert_eq!(surface.text(targets::MARKET_STATE), Some("TRENDING"));
        assert_eq!(surface.class(targets::MARKET_STATE), Some("trending"));
        assert_eq!(surface.text(targets::CONFIDENCE), Some("82.5%"));

        snap.adx = 18.0;
        snap.market_state = MarketState::Ranging;
        render_indicators(&mut surface, &snap);
        assert_eq!(surface.class(targets::ADX_VALUE), None);
        assert_eq!(surface.class(targets::MARKET_STATE), Some("ranging"));
    }

    #[test]
    fn test_performance_placeholders() {
        let mut surface = TermSurface::new();
        let snap = PerformanceSnapshot {
            total_trades: 12,
            wins: 7,
            losses: 5,
            win_rate: 58.33,
            profit_factor: None,
            avg_pnl: 0.42,
            best_trade: 3.1,
            worst_trade: -2.0,
            total_pnl: 5.0,
        };

        render_performance(&mut surface, &snap);
        assert_eq!(surface.text(targets::PROFIT_FACTOR), Some("N/A"));
        assert_eq!(surface.text(targets::WIN_RATE), Some("58.33%"));
        assert_eq!(surface.class(targets::WIN_RATE), Some("positive"));

        let snap = PerformanceSnapshot {
            profit_factor: Some(1.85),
            win_rate: 41.67,
            ..snap
        };
        render_performance(&mut surface, &snap);
        assert_eq!(surface.text(targets::PROFIT_FACTOR), Some("1.85"));
        assert_eq!(surface.class(targets::WIN_RATE), None);
    }

    #[test]
    fn test_risk_bar_thresholds() {
        // Danger needs both the ratio and the eligibility flag
        assert_eq!(risk_bar_class(85.0, true), Some("danger"));
        assert_eq!(risk_bar_class(85.0, false), Some("warning"));
        assert_eq!(risk_bar_class(60.0, true), Some("warning"));
        assert_eq!(risk_bar_class(40.0, true), None);
    }

    #[test]
    fn test_risk_section() {
        let mut surface = TermSurface::new();
        let snap = RiskSnapshot {
            daily_pnl: -4.5,
            max_drawdown: 9.0,
            daily_loss_limit: 5.0,
            max_drawdown_limit: 15.0,
            consecutive_wins: 0,
            consecutive_losses: 3,
            circuit_breaker: true,
            positions_open: 0,
            positions_max: 2,
            can_trade: false,
        };

        render_risk(&mut surface, &snap);

        // abs(-4.5 / 5.0) * 100 = 90 -> danger (daily pnl negative)
        assert_eq!(surface.width(targets::DAILY_PNL_BAR), Some(90.0));
        assert_eq!(surface.class(targets::DAILY_PNL_BAR), Some("danger"));
        // 9 / 15 * 100 = 60 -> warning
        assert_eq!(surface.width(targets::DRAWDOWN_BAR), Some(60.0));
        assert_eq!(surface.class(targets::DRAWDOWN_BAR), Some("warning"));
        assert_eq!(surface.text(targets::CIRCUIT_BREAKER), Some("ACTIVE"));
        assert_eq!(surface.class(targets::CIRCUIT_BREAKER), Some("danger"));
        // Quirk: negative daily pnl renders magnitude only
        assert_eq!(surface.text(targets::DAILY_PNL), Some("$4.50"));
    }

    #[test]
    fn test_daily_bar_positive_day_never_danger() {
        let mut surface = TermSurface::new();
        let snap = RiskSnapshot {
            daily_pnl: 4.5,
            max_drawdown: 0.0,
            daily_loss_limit: 5.0,
            max_drawdown_limit: 15.0,
            consecutive_wins: 2,
            consecutive_losses: 0,
            circuit_breaker: false,
            positions_open: 0,
            positions_max: 2,
            can_trade: true,
        };

        render_risk(&mut surface, &snap);
        // Ratio is 90 but the day is positive, so warning is the ceiling
        assert_eq!(surface.class(targets::DAILY_PNL_BAR), Some("warning"));
        assert_eq!(surface.text(targets::CIRCUIT_BREAKER), Some("OK"));
    }

    #[test]
    fn test_empty_trades_names_active_filter() {
        let mut surface = TermSurface::new();
        let resp = TradesResponse { trades: vec![] };

        render_trades(&mut surface, &resp, Some("live"));
        let cards = surface.cards(targets::TRADES_LIST).unwrap();
        assert_eq!(cards[0].lines[0].text, "No live trades yet");

        render_trades(&mut surface, &resp, None);
        let cards = surface.cards(targets::TRADES_LIST).unwrap();
        assert_eq!(cards[0].lines[0].text, "No trades yet");
    }

    #[test]
    fn test_trade_cards() {
        let mut surface = TermSurface::new();
        let resp = TradesResponse {
            trades: vec![TradeRecord {
                side: "LONG".to_string(),
                trading_mode: TradingMode::Paper,
                pnl: -1.2,
                pnl_percent: -0.75,
                entry_price: 107500.0,
                exit_price: 106700.0,
                exit_reason: "stop_loss".to_string(),
                hold_duration: 1.5,
                closed_at: None,
            }],
        };

        render_trades(&mut surface, &resp, None);

        let cards = surface.cards(targets::TRADES_LIST).unwrap();
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.lines[0].text, "LONG [paper]");
        // Currency drops the minus, percent keeps it
        assert_eq!(card.lines[1].text, "$1.20 (-0.75%)");
        assert_eq!(card.lines[1].class, Some("loss"));
        assert_eq!(card.lines[2].text, "$107500.00 -> $106700.00");
        // 1.5 hours -> 5400 seconds -> "1h 30m"
        assert_eq!(card.lines[3].text, "stop_loss | held 1h 30m");
        assert_eq!(card.lines[4].text, "N/A");
    }
}
