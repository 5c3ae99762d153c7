use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Gap between reported and computed net pay above which a paystub is
/// flagged.
const NET_PAY_TOLERANCE: Decimal = dec!(1000);

/// Things that look wrong on a paystub but do not prevent using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaystubWarning {
    MissingPayDate,
    ZeroGrossPay,
    ZeroNetPay,
    NetExceedsGross,
    DeductionMismatch { expected_net: Decimal, net_pay: Decimal },
}

impl fmt::Display for PaystubWarning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::MissingPayDate => write!(f, "pay date is missing"),
            Self::ZeroGrossPay => write!(f, "gross pay is zero"),
            Self::ZeroNetPay => write!(f, "net pay is zero"),
            Self::NetExceedsGross => write!(f, "net pay exceeds gross pay; values may be swapped"),
            Self::DeductionMismatch {
                expected_net,
                net_pay,
            } => write!(
                f,
                "gross minus deductions is {expected_net} but net pay is {net_pay}"
            ),
        }
    }
}

/// One pay period's earnings statement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paystub {
    pub pay_date: Option<NaiveDate>,
    pub gross_pay: Decimal,
    pub federal_withheld: Decimal,
    pub state_withheld: Decimal,
    pub fica_withheld: Decimal,
    pub net_pay: Decimal,
    pub pretax_401k: Decimal,
    pub rsu_income: Option<Decimal>,
}

impl Paystub {
    pub fn total_deductions(&self) -> Decimal {
        self.federal_withheld + self.state_withheld + self.fica_withheld + self.pretax_401k
    }

    pub fn validation_warnings(&self) -> Vec<PaystubWarning> {
        let mut warnings = Vec::new();

        if self.pay_date.is_none() {
            warnings.push(PaystubWarning::MissingPayDate);
        }
        if self.gross_pay.is_zero() {
            warnings.push(PaystubWarning::ZeroGrossPay);
        }
        if self.net_pay.is_zero() {
            warnings.push(PaystubWarning::ZeroNetPay);
        }
        if self.net_pay > self.gross_pay {
            warnings.push(PaystubWarning::NetExceedsGross);
        }

        let expected_net = self.gross_pay - self.total_deductions();
        if self.net_pay > Decimal::ZERO && (expected_net - self.net_pay).abs() > NET_PAY_TOLERANCE {
            warnings.push(PaystubWarning::DeductionMismatch {
                expected_net,
                net_pay: self.net_pay,
            });
        }

        warnings
    }
}

/// Year-to-date sums across a set of paystubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YtdTotals {
    pub paystub_count: usize,
    pub gross_income: Decimal,
    pub federal_withheld: Decimal,
    pub state_withheld: Decimal,
    pub fica_withheld: Decimal,
    pub pretax_401k: Decimal,
    pub net_pay: Decimal,
    pub rsu_income: Decimal,
}

impl YtdTotals {
    pub fn from_paystubs<'a>(paystubs: impl IntoIterator<Item = &'a Paystub>) -> Self {
        paystubs
            .into_iter()
            .fold(Self::default(), |mut totals, stub| {
                totals.paystub_count += 1;
                totals.gross_income += stub.gross_pay;
                totals.federal_withheld += stub.federal_withheld;
                totals.state_withheld += stub.state_withheld;
                totals.fica_withheld += stub.fica_withheld;
                totals.pretax_401k += stub.pretax_401k;
                totals.net_pay += stub.net_pay;
                totals.rsu_income += stub.rsu_income.unwrap_or_default();
                totals
            })
    }

    /// Federal + state + FICA withholding.
    pub fn total_withheld(&self) -> Decimal {
        self.federal_withheld + self.state_withheld + self.fica_withheld
    }
}

impl fmt::Display for YtdTotals {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Paystubs:           {:>12}", self.paystub_count)?;
        writeln!(f, "Gross income:       {:>12}", self.gross_income)?;
        writeln!(f, "RSU income:         {:>12}", self.rsu_income)?;
        writeln!(f, "Federal withheld:   {:>12}", self.federal_withheld)?;
        writeln!(f, "State withheld:     {:>12}", self.state_withheld)?;
        writeln!(f, "FICA withheld:      {:>12}", self.fica_withheld)?;
        writeln!(f, "401(k) deferrals:   {:>12}", self.pretax_401k)?;
        write!(f, "Net pay:            {:>12}", self.net_pay)
    }
}
