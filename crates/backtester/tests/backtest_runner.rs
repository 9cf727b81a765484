use analytics::engine::AnalyticsEngine;
use backtester::{Backtester, RunWindow, VecDataFeed};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_types::{ExitReason, PriceBar, Symbol};
use engine::Bot;
use execution::{SimulatedExecutor, SimulationSettings};
use proptest::prelude::*;
use risk::{SimplePositionManager, SimpleRiskSettings};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategies::{MACrossover, MACrossoverSettings};

fn tsla() -> Symbol {
    Symbol::from("TSLA")
}

fn window() -> RunWindow {
    RunWindow::new(
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
    )
    .unwrap()
}

fn backtester(fast_period: u32, slow_period: u32, cash: Decimal) -> Backtester {
    let generator = MACrossover::new(MACrossoverSettings {
        fast_period,
        slow_period,
        warmup_bars: None,
    })
    .unwrap();
    let manager = SimplePositionManager::new(SimpleRiskSettings::default()).unwrap();
    let bot = Bot::new(tsla(), Box::new(generator), Box::new(manager));
    let host = SimulatedExecutor::new(SimulationSettings::default(), tsla(), cash).unwrap();
    Backtester::new(bot, host, window(), AnalyticsEngine::default())
}

/// One bar per day starting 2018-01-02.
fn feed(closes: &[Option<Decimal>]) -> VecDataFeed {
    let start = Utc.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| PriceBar {
            timestamp: start + Duration::days(i as i64),
            close: *close,
        })
        .collect();
    VecDataFeed::new(tsla(), bars)
}

fn prices(closes: &[Decimal]) -> Vec<Option<Decimal>> {
    closes.iter().copied().map(Some).collect()
}

#[test]
fn take_profit_closes_the_trade_above_ten_percent() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let closes = prices(&[
        dec!(100), dec!(100), dec!(100), dec!(100),
        dec!(101), dec!(105), dec!(112),
    ]);

    let result = bt.run(&mut feed(&closes)).unwrap();

    assert_eq!(result.trades.len(), 1);
    let trade = &result.trades[0];
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert_eq!(trade.entry_price, dec!(101));
    assert_eq!(trade.exit_price, dec!(112));
    assert_eq!(trade.quantity, 990);
    assert_eq!(trade.pnl, dec!(10890));

    let values: Vec<_> = result.equity_curve.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![dec!(100000), dec!(103960), dec!(110890)]);
    assert!((result.report.summary.total_return - 0.1089).abs() < 1e-12);
    assert!(result.report.summary.sharpe_ratio > 0.0);
    assert_eq!(bt.host.portfolio().quantity, 0);
}

#[test]
fn stop_loss_closes_the_trade_below_five_percent() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let closes = prices(&[
        dec!(100), dec!(100), dec!(100), dec!(100),
        dec!(101), dec!(95),
    ]);

    let result = bt.run(&mut feed(&closes)).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].exit_reason, ExitReason::StopLoss);
    assert_eq!(result.trades[0].pnl, dec!(-5940));
    assert_eq!(result.report.final_value, dec!(94060));
    assert_eq!(result.report.win_rate, 0.0);
}

#[test]
fn bearish_crossover_exits_without_touching_the_stop() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let closes = prices(&[
        dec!(100), dec!(100), dec!(100), dec!(100),
        dec!(101), dec!(100), dec!(99.5),
    ]);

    let result = bt.run(&mut feed(&closes)).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].exit_reason, ExitReason::BearishSignal);
    assert_eq!(result.trades[0].exit_price, dec!(99.5));
}

#[test]
fn missing_bars_do_not_count_toward_warmup() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let closes = vec![
        Some(dec!(100)),
        None,
        Some(dec!(100)),
        Some(dec!(100)),
        Some(dec!(100)),
        Some(dec!(101)),
        None,
    ];

    let result = bt.run(&mut feed(&closes)).unwrap();

    assert_eq!(result.skipped_bars, 2);
    // The sixth bar is the first tradable one; the trailing missing bar still gets a
    // snapshot valued at the last known price.
    assert_eq!(result.snapshots.len(), 2);
    assert_eq!(result.snapshots[0].holdings, 990);
    assert_eq!(result.snapshots[1].price, None);
    assert_eq!(result.snapshots[1].portfolio_value, dec!(100000));
    assert!(result.trades.is_empty());
    assert!(bt.bot.position().is_long());
}

#[test]
fn run_shorter_than_warmup_records_nothing() {
    let mut bt = backtester(50, 200, dec!(100_000));
    let closes = prices(&vec![dec!(100); 200]);

    let result = bt.run(&mut feed(&closes)).unwrap();

    assert!(result.equity_curve.is_empty());
    assert!(result.trades.is_empty());
    assert_eq!(result.report.summary.sharpe_ratio, 0.0);
    assert_eq!(result.report.summary.total_return, 0.0);
    assert_eq!(result.report.benchmark_return, None);
}

fn at(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Flat bars at 100 on consecutive days before the 2018-01-01 start date.
fn history(count: u32) -> Vec<PriceBar> {
    (0..count)
        .map(|i| PriceBar::new(at(2017, 12, 31 - count + 1 + i), dec!(100)))
        .collect()
}

#[test]
fn history_before_the_start_date_warms_up_the_indicators() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let mut bars = history(4);
    bars.extend([
        PriceBar::new(at(2018, 1, 2), dec!(101)),
        PriceBar::new(at(2018, 1, 3), dec!(102)),
        PriceBar::new(at(2018, 1, 4), dec!(103)),
    ]);

    let result = bt.run(&mut VecDataFeed::new(tsla(), bars)).unwrap();

    // Every in-window bar is tradable; the first one enters.
    assert_eq!(result.history_bars, 4);
    assert_eq!(result.snapshots.len(), 3);
    assert_eq!(result.snapshots[0].timestamp, at(2018, 1, 2));
    assert_eq!(result.snapshots[0].holdings, 990);
    assert_eq!(bt.bot.position().entry_price, Some(dec!(101)));

    let values: Vec<_> = result.equity_curve.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![dec!(100000), dec!(100990), dec!(101980)]);
    assert!((result.report.summary.total_return - 0.0198).abs() < 1e-12);

    // History closes stay out of the benchmark.
    let benchmark = result.report.benchmark_return.unwrap();
    assert!((benchmark - 2.0 / 101.0).abs() < 1e-12);
}

#[test]
fn short_history_finishes_warming_up_inside_the_window() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let mut bars = history(2);
    bars.extend([
        PriceBar::new(at(2018, 1, 2), dec!(100)),
        PriceBar::new(at(2018, 1, 3), dec!(100)),
        PriceBar::new(at(2018, 1, 4), dec!(101)),
    ]);

    let result = bt.run(&mut VecDataFeed::new(tsla(), bars)).unwrap();

    assert_eq!(result.history_bars, 2);
    assert_eq!(result.snapshots.len(), 1);
    assert_eq!(result.snapshots[0].timestamp, at(2018, 1, 4));
    assert_eq!(result.snapshots[0].holdings, 990);
}

#[test]
fn bars_after_the_end_date_are_never_seen() {
    let mut bt = backtester(2, 4, dec!(100_000));
    let mut bars = history(4);
    bars.extend([
        PriceBar::new(at(2018, 1, 2), dec!(100)),
        PriceBar::new(at(2018, 1, 3), dec!(100)),
        PriceBar::new(at(2023, 1, 2), dec!(500)),
    ]);

    let result = bt.run(&mut VecDataFeed::new(tsla(), bars)).unwrap();

    assert_eq!(result.equity_curve.len(), 2);
    assert!(result.trades.is_empty());
    assert_eq!(result.report.benchmark_return, Some(0.0));
    assert_eq!(result.report.final_value, dec!(100000));
}

#[test]
fn entry_fee_on_the_first_day_counts_against_total_return() {
    let generator = MACrossover::new(MACrossoverSettings {
        fast_period: 2,
        slow_period: 4,
        warmup_bars: None,
    })
    .unwrap();
    let manager = SimplePositionManager::new(SimpleRiskSettings::default()).unwrap();
    let bot = Bot::new(tsla(), Box::new(generator), Box::new(manager));
    let settings = SimulationSettings {
        taker_fee: 0.01,
        slippage_percent: 0.0,
    };
    let host = SimulatedExecutor::new(settings, tsla(), dec!(100_000)).unwrap();
    let mut bt = Backtester::new(bot, host, window(), AnalyticsEngine::default());

    let mut bars = history(4);
    bars.push(PriceBar::new(at(2018, 1, 2), dec!(101)));
    let result = bt.run(&mut VecDataFeed::new(tsla(), bars)).unwrap();

    // 980 shares at 101 cost 98980 plus a 989.80 fee.
    assert_eq!(result.equity_curve[0].value, dec!(99010.20));
    assert_eq!(result.report.starting_value, dec!(100000));
    assert!((result.report.summary.total_return - (-0.009898)).abs() < 1e-12);
}

#[test]
fn csv_file_runs_end_to_end() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "date,close").unwrap();
    for (i, close) in ["100", "100", "100", "100", "101", "", "105", "112"].iter().enumerate() {
        writeln!(file, "2018-01-{:02},{}", i + 2, close).unwrap();
    }

    let mut feed = VecDataFeed::from_csv_path(tsla(), file.path()).unwrap();
    let mut bt = backtester(2, 4, dec!(100_000));
    let result = bt.run(&mut feed).unwrap();

    assert_eq!(result.skipped_bars, 1);
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].exit_reason, ExitReason::TakeProfit);
}

proptest! {
    #[test]
    fn accounting_stays_consistent_on_random_walks(
        steps in prop::collection::vec(prop::option::weighted(0.95, -30i64..=30), 1..120)
    ) {
        let mut level = dec!(100);
        let closes: Vec<Option<Decimal>> = steps
            .iter()
            .map(|step| {
                step.map(|s| {
                    level = (level + Decimal::new(s, 1)).max(dec!(1));
                    level
                })
            })
            .collect();

        let mut bt = backtester(3, 8, dec!(10_000));
        let result = bt.run(&mut feed(&closes)).unwrap();

        prop_assert_eq!(result.equity_curve.len(), result.snapshots.len());
        for snapshot in &result.snapshots {
            prop_assert!(snapshot.holdings >= 0);
            prop_assert!(snapshot.portfolio_value > Decimal::ZERO);
        }
        for trade in &result.trades {
            prop_assert!(trade.quantity > 0);
            prop_assert!(trade.exit_time > trade.entry_time);
        }
        if let Some(last) = result.equity_curve.last() {
            prop_assert_eq!(last.value, bt.host.portfolio().total_value());
        }
        prop_assert_eq!(bt.bot.position().holdings, bt.host.portfolio().quantity);
    }
}
