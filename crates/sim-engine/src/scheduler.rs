use chrono::{Datelike, NaiveDate};
use sim_types::{ContributionFrequency, RebalanceFrequency};

/// Stateless-per-call by contract, but tracking which (year, month) or
/// (year) period last fired is unavoidable to answer "is this the first
/// trading date on/after the first calendar day of the period" without
/// looking ahead — so each `Scheduler` owns that one piece of state per
/// strategy, advanced one date at a time in ascending order (§4.5).
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    rebalanced_ever: bool,
    last_rebalance_period: Option<Period>,
    last_contribution_period: Option<Period>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Year(i32),
    YearMonth(i32, u32),
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `never` fires exactly once, on the first trading date of the run.
    pub fn rebalance_due(&mut self, frequency: RebalanceFrequency, date: NaiveDate) -> bool {
        let due = match frequency {
            RebalanceFrequency::Never => !self.rebalanced_ever,
            RebalanceFrequency::Daily => true,
            RebalanceFrequency::Monthly => {
                period_advanced(self.last_rebalance_period, date, false)
            }
            RebalanceFrequency::Yearly => {
                period_advanced(self.last_rebalance_period, date, true)
            }
        };
        if due {
            self.rebalanced_ever = true;
            match frequency {
                RebalanceFrequency::Monthly => {
                    self.last_rebalance_period = Some(Period::YearMonth(date.year(), date.month()))
                }
                RebalanceFrequency::Yearly => {
                    self.last_rebalance_period = Some(Period::Year(date.year()))
                }
                _ => {}
            }
        }
        due
    }

    pub fn contribution_due(&mut self, frequency: ContributionFrequency, date: NaiveDate) -> bool {
        let due = match frequency {
            ContributionFrequency::None => false,
            ContributionFrequency::Daily => true,
            ContributionFrequency::Monthly => {
                period_advanced(self.last_contribution_period, date, false)
            }
            ContributionFrequency::Yearly => {
                period_advanced(self.last_contribution_period, date, true)
            }
        };
        if due {
            match frequency {
                ContributionFrequency::Monthly => {
                    self.last_contribution_period =
                        Some(Period::YearMonth(date.year(), date.month()))
                }
                ContributionFrequency::Yearly => {
                    self.last_contribution_period = Some(Period::Year(date.year()))
                }
                _ => {}
            }
        }
        due
    }
}

fn period_advanced(last: Option<Period>, date: NaiveDate, yearly: bool) -> bool {
    let current = if yearly {
        Period::Year(date.year())
    } else {
        Period::YearMonth(date.year(), date.month())
    };
    last != Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn never_fires_only_on_the_first_date() {
        let mut s = Scheduler::new();
        assert!(s.rebalance_due(RebalanceFrequency::Never, d(2020, 1, 2)));
        assert!(!s.rebalance_due(RebalanceFrequency::Never, d(2020, 1, 3)));
        assert!(!s.rebalance_due(RebalanceFrequency::Never, d(2020, 6, 1)));
    }

    #[test]
    fn monthly_fires_on_the_first_trading_date_of_each_month() {
        let mut s = Scheduler::new();
        assert!(s.rebalance_due(RebalanceFrequency::Monthly, d(2020, 1, 2)));
        assert!(!s.rebalance_due(RebalanceFrequency::Monthly, d(2020, 1, 3)));
        assert!(!s.rebalance_due(RebalanceFrequency::Monthly, d(2020, 1, 31)));
        assert!(s.rebalance_due(RebalanceFrequency::Monthly, d(2020, 2, 3)));
    }

    #[test]
    fn yearly_fires_on_the_first_trading_date_of_each_year() {
        let mut s = Scheduler::new();
        assert!(s.rebalance_due(RebalanceFrequency::Yearly, d(2020, 1, 2)));
        assert!(!s.rebalance_due(RebalanceFrequency::Yearly, d(2020, 6, 1)));
        assert!(s.rebalance_due(RebalanceFrequency::Yearly, d(2021, 1, 4)));
    }

    #[test]
    fn contribution_none_never_fires() {
        let mut s = Scheduler::new();
        assert!(!s.contribution_due(ContributionFrequency::None, d(2020, 1, 2)));
        assert!(!s.contribution_due(ContributionFrequency::None, d(2020, 6, 1)));
    }

    #[test]
    fn contribution_daily_fires_every_date() {
        let mut s = Scheduler::new();
        assert!(s.contribution_due(ContributionFrequency::Daily, d(2020, 1, 2)));
        assert!(s.contribution_due(ContributionFrequency::Daily, d(2020, 1, 3)));
    }
}
