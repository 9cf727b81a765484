// In crates/backtester/src/report.rs

use analytics::types::PerformanceReport;

/// Prints the performance report in a readable format.
pub fn print_report(report: &PerformanceReport) {
    println!("\n--- Backtest Performance Report ---");
    println!("-----------------------------------");
    println!("Sharpe Ratio:          {:.4}", report.summary.sharpe_ratio);
    println!(
        "Total Return:          {:.2}%",
        report.summary.total_return_percentage()
    );
    println!("-----------------------------------");
    println!("Starting Value:        ${:.2}", report.starting_value);
    println!("Final Value:           ${:.2}", report.final_value);
    println!("Net P&L:               ${:.2}", report.net_pnl_absolute);
    println!(
        "Max Drawdown:          ${:.2} ({:.2}%)",
        report.max_drawdown_absolute, report.max_drawdown_percentage
    );
    println!("Total Trades:          {}", report.total_trades);
    println!("Win Rate:              {:.2}%", report.win_rate);
    match report.benchmark_return {
        Some(benchmark) => println!("Buy & Hold Return:     {:.2}%", benchmark * 100.0),
        None => println!("Buy & Hold Return:     n/a"),
    }
    println!("-----------------------------------");
}
