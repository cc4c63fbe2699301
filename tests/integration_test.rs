//! End-to-end tests of the engine through mock ports.
//!
//! Tests cover:
//! - Reference-rate position compounding published daily rates
//! - Ticker positions built from closing prices
//! - Two staggered positions aligned into one portfolio
//! - Recurring contributions folded into one trajectory
//! - NoData and source failures reaching the caller

mod common;

use approx::assert_relative_eq;
use common::*;
use accrue::cli::build_portfolio;
use accrue::domain::config_validation::PortfolioConfig;
use accrue::domain::date_axis::Frequency;
use accrue::domain::error::AccrueError;
use accrue::domain::portfolio::Portfolio;
use accrue::domain::position::{PositionKind, PositionSpec, build_position};
use std::path::PathBuf;

fn spec(kind: PositionKind, identifier: &str, value: f64, start: u32, end: u32) -> PositionSpec {
    PositionSpec {
        name: identifier.to_lowercase(),
        kind,
        identifier: identifier.to_string(),
        value,
        start: day(start),
        end: day(end),
        frequency: None,
        percentage: 100.0,
        withholding: false,
    }
}

mod reference_rate {
    use super::*;

    #[test]
    fn three_days_of_published_rate() {
        let rates = MockRatePort::new().with_rates("SELIC", daily_rates(day(1), &[0.0519; 3]));
        let prices = MockPricePort::new();

        let position = build_position(
            &spec(PositionKind::ReferenceRate, "SELIC", 1000.0, 1, 3),
            &prices,
            &rates,
        )
        .unwrap();

        let expected = 1.000519_f64.powi(3);
        let cum = position.result.cumulative.value("SELIC", day(3)).unwrap();
        assert_relative_eq!(cum, expected, epsilon = 1e-12);
        let cc = position
            .result
            .cumulative_capital
            .value("SELIC", day(3))
            .unwrap();
        assert_relative_eq!(cc, 1000.0 * expected, epsilon = 1e-9);
    }

    #[test]
    fn percentage_scales_the_rate() {
        let rates = MockRatePort::new().with_rates("CDI", daily_rates(day(1), &[0.05; 2]));
        let mut s = spec(PositionKind::ReferenceRate, "CDI", 100.0, 1, 2);
        s.percentage = 110.0;

        let position = build_position(&s, &MockPricePort::new(), &rates).unwrap();
        let cum = position.result.cumulative.value("CDI", day(2)).unwrap();
        assert_relative_eq!(cum, 1.00055_f64.powi(2), epsilon = 1e-12);
    }

    #[test]
    fn withholding_reduces_gain() {
        let rates = MockRatePort::new().with_rates("CDI", daily_rates(day(1), &[0.04; 10]));
        let gross = build_position(
            &spec(PositionKind::ReferenceRate, "CDI", 100.0, 1, 10),
            &MockPricePort::new(),
            &rates,
        )
        .unwrap();
        let mut s = spec(PositionKind::ReferenceRate, "CDI", 100.0, 1, 10);
        s.withholding = true;
        let net = build_position(&s, &MockPricePort::new(), &rates).unwrap();

        let gross_value = gross.final_value().unwrap();
        let net_value = net.final_value().unwrap();
        assert_relative_eq!(
            net_value - 100.0,
            (gross_value - 100.0) * (1.0 - 0.225),
            epsilon = 1e-9
        );
    }

    #[test]
    fn unpublished_tail_holds_last_level() {
        let rates = MockRatePort::new().with_rates("SELIC", daily_rates(day(1), &[0.05; 3]));
        let position = build_position(
            &spec(PositionKind::ReferenceRate, "SELIC", 100.0, 1, 6),
            &MockPricePort::new(),
            &rates,
        )
        .unwrap();
        let cc = &position.result.cumulative_capital;
        assert_eq!(cc.index().last(), Some(&day(6)));
        assert_eq!(cc.value("SELIC", day(6)), cc.value("SELIC", day(3)));
    }
}

mod ticker {
    use super::*;

    #[test]
    fn closes_compound_to_price_ratio() {
        let prices = MockPricePort::new().with_closes(
            "PETR4.SA",
            vec![
                make_close("2024-01-02", 30.0),
                make_close("2024-01-03", 33.0),
                make_close("2024-01-04", 31.5),
            ],
        );

        let position = build_position(
            &spec(PositionKind::Ticker, "PETR4.SA", 300.0, 1, 5),
            &prices,
            &MockRatePort::new(),
        )
        .unwrap();

        let cc = &position.result.cumulative_capital;
        assert_eq!(cc.index().first(), Some(&day(2)));
        assert_relative_eq!(cc.value("PETR4.SA", day(2)).unwrap(), 300.0);
        assert_relative_eq!(cc.value("PETR4.SA", day(3)).unwrap(), 330.0, epsilon = 1e-9);
        assert_relative_eq!(cc.value("PETR4.SA", day(4)).unwrap(), 315.0, epsilon = 1e-9);
    }

    #[test]
    fn last_price_is_reported() {
        let prices = MockPricePort::new().with_closes("VALE3.SA", growing_closes(1, 5, 60.0, 1.01));
        let last = accrue::ports::data_port::PricePort::last_price(&prices, "VALE3.SA").unwrap();
        assert_eq!(last.date, day(5));
    }
}

mod portfolio_alignment {
    use super::*;

    #[test]
    fn staggered_positions_share_one_axis() {
        let prices = MockPricePort::new()
            .with_closes("ONE", growing_closes(1, 10, 10.0, 1.01))
            .with_closes("TWO", growing_closes(5, 15, 20.0, 1.02));
        let rates = MockRatePort::new();

        let positions = vec![
            build_position(&spec(PositionKind::Ticker, "ONE", 100.0, 1, 10), &prices, &rates)
                .unwrap(),
            build_position(&spec(PositionKind::Ticker, "TWO", 100.0, 5, 15), &prices, &rates)
                .unwrap(),
        ];
        let portfolio = Portfolio::new(positions, day(15)).unwrap();

        let cc = &portfolio.result.cumulative_capital;
        assert_eq!(cc.index().first(), Some(&day(1)));
        assert_eq!(cc.index().last(), Some(&day(15)));
        assert_eq!(cc.len(), 15);
        let day10 = cc.value("ONE", day(10)).unwrap();
        for d in 11..=15 {
            assert_eq!(cc.value("ONE", day(d)), Some(day10));
        }
        assert_eq!(cc.value("TWO", day(4)), None);

        let totals = portfolio.totals();
        assert_eq!(totals.active.value("active", day(4)), Some(1.0));
        assert_eq!(totals.active.value("active", day(5)), Some(2.0));
        assert_eq!(totals.invested.value("invested", day(15)), Some(200.0));
    }

    #[test]
    fn build_portfolio_leaves_out_members_without_data() {
        let prices = MockPricePort::new().with_closes("ONE", growing_closes(1, 5, 10.0, 1.01));
        let config = PortfolioConfig {
            data_dir: PathBuf::from("."),
            as_of: day(5),
            positions: vec![
                spec(PositionKind::Ticker, "ONE", 100.0, 1, 5),
                spec(PositionKind::Ticker, "GHOST", 100.0, 1, 5),
            ],
        };

        let portfolio = build_portfolio(&config, &prices, &MockRatePort::new(), day(5)).unwrap();
        assert_eq!(portfolio.positions.len(), 1);
        assert_eq!(portfolio.result.raw.column_names(), vec!["ONE"]);
    }

    #[test]
    fn build_portfolio_without_any_data_is_no_data() {
        let config = PortfolioConfig {
            data_dir: PathBuf::from("."),
            as_of: day(5),
            positions: vec![spec(PositionKind::Ticker, "GHOST", 100.0, 1, 5)],
        };
        let err =
            build_portfolio(&config, &MockPricePort::new(), &MockRatePort::new(), day(5))
                .unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn source_failure_is_not_swallowed() {
        let prices = MockPricePort::new()
            .with_closes("ONE", growing_closes(1, 5, 10.0, 1.01))
            .with_error("BAD", "connection refused");
        let config = PortfolioConfig {
            data_dir: PathBuf::from("."),
            as_of: day(5),
            positions: vec![
                spec(PositionKind::Ticker, "ONE", 100.0, 1, 5),
                spec(PositionKind::Ticker, "BAD", 100.0, 1, 5),
            ],
        };
        let err = build_portfolio(&config, &prices, &MockRatePort::new(), day(5)).unwrap_err();
        assert!(matches!(err, AccrueError::DataSource { .. }));
    }
}

mod recurring {
    use super::*;

    #[test]
    fn two_monthly_tranches_fold_into_one_trajectory() {
        let start = date(2024, 4, 1);
        let closes = start
            .iter_days()
            .take(40)
            .enumerate()
            .map(|(i, d)| accrue::domain::quote::PricePoint {
                date: d,
                close: 50.0 * 1.01_f64.powi(i as i32),
            })
            .collect();
        let prices = MockPricePort::new().with_closes("X", closes);

        let mut s = spec(PositionKind::Ticker, "X", 100.0, 1, 1);
        s.start = start;
        s.end = date(2024, 5, 10);
        s.frequency = Some(Frequency::Monthly);

        let position = build_position(&s, &prices, &MockRatePort::new()).unwrap();
        assert_eq!(position.tranches, 2);
        assert!(position.is_recurring());

        let day30 = date(2024, 5, 1);
        let folded = position.result.cumulative_capital.value("X", day30).unwrap();
        assert_relative_eq!(folded, 100.0 * 1.01_f64.powi(30) + 100.0, epsilon = 1e-9);
        assert_eq!(position.default.raw.value("X", day30), Some(2.0));
    }

    #[test]
    fn recurring_member_in_portfolio() {
        let prices = MockPricePort::new().with_closes("X", growing_closes(1, 31, 10.0, 1.001));
        let mut s = spec(PositionKind::Ticker, "X", 10.0, 1, 31);
        s.frequency = Some(Frequency::Weekly);

        let position = build_position(&s, &prices, &MockRatePort::new()).unwrap();
        assert_eq!(position.tranches, 5);

        let portfolio = Portfolio::new(vec![position], day(31)).unwrap();
        let totals = portfolio.totals();
        assert_eq!(totals.invested.value("invested", day(31)), Some(50.0));
        assert_eq!(totals.active.value("active", day(31)), Some(5.0));
        assert!(totals.growth.value("growth", day(31)).unwrap() > 1.0);
    }
}

mod recurring_rate {
    use super::*;
    use chrono::NaiveDate;

    /// Final value of one lump sum of `s` per start date, summed.
    fn lump_sum_total(rates: &MockRatePort, s: &PositionSpec, starts: &[NaiveDate]) -> f64 {
        starts
            .iter()
            .map(|d| {
                let mut lump = s.clone();
                lump.frequency = None;
                lump.start = *d;
                build_position(&lump, &MockPricePort::new(), rates)
                    .unwrap()
                    .final_value()
                    .unwrap()
            })
            .sum()
    }

    #[test]
    fn daily_contributions_match_independent_lump_sums() {
        let rates = MockRatePort::new().with_rates("CDI", daily_rates(day(1), &[1.0; 3]));
        let mut s = spec(PositionKind::ReferenceRate, "CDI", 100.0, 1, 3);
        s.frequency = Some(Frequency::Daily);

        let position = build_position(&s, &MockPricePort::new(), &rates).unwrap();
        assert_eq!(position.tranches, 3);
        assert_relative_eq!(
            position.final_value().unwrap(),
            lump_sum_total(&rates, &s, &[day(1), day(2), day(3)]),
            epsilon = 1e-9
        );
        assert_relative_eq!(position.final_value().unwrap(), 306.0401, epsilon = 1e-9);
    }

    #[test]
    fn withholding_follows_each_contribution() {
        let start = date(2024, 1, 1);
        let rates = MockRatePort::new().with_rates("CDI", daily_rates(start, &[0.05; 200]));
        let mut s = spec(PositionKind::ReferenceRate, "CDI", 100.0, 1, 1);
        s.start = start;
        s.end = date(2024, 7, 1);
        s.frequency = Some(Frequency::Monthly);
        s.withholding = true;

        let position = build_position(&s, &MockPricePort::new(), &rates).unwrap();
        assert_eq!(position.tranches, 7);

        let contributions = [
            date(2024, 1, 1),
            date(2024, 2, 1),
            date(2024, 3, 1),
            date(2024, 4, 1),
            date(2024, 5, 1),
            date(2024, 6, 1),
            date(2024, 7, 1),
        ];
        assert_relative_eq!(
            position.final_value().unwrap(),
            lump_sum_total(&rates, &s, &contributions),
            epsilon = 1e-9
        );
    }
}

mod errors {
    use super::*;

    #[test]
    fn empty_history_is_no_data() {
        let err = build_position(
            &spec(PositionKind::Ticker, "NONE", 100.0, 1, 5),
            &MockPricePort::new(),
            &MockRatePort::new(),
        )
        .unwrap_err();
        assert!(err.is_no_data());
        assert_eq!(
            err.to_string(),
            "no data for NONE between 2024-01-01 and 2024-01-05"
        );
    }

    #[test]
    fn reversed_range_is_checked_before_fetching() {
        let prices = MockPricePort::new();
        let err = build_position(
            &spec(PositionKind::Ticker, "X", 100.0, 5, 1),
            &prices,
            &MockRatePort::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AccrueError::InvalidRange { .. }));
        assert!(prices.calls.borrow().is_empty());
    }

    #[test]
    fn last_price_without_data_is_no_data() {
        let prices = MockPricePort::new();
        let err = accrue::ports::data_port::PricePort::last_price(&prices, "X").unwrap_err();
        assert!(err.is_no_data());
    }
}
