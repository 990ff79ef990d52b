#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    CashDeposit,
    MoneyInIndividual,
    MoneyInBusiness,
    LoanSavingsCredit,
    OtherIncome,
    MoneyTransferOutgoing,
    BuyGoods,
    BillPayment,
    PochiLaBiashara,
    Fuliza,
    CashWithdrawal,
    Airtime,
    OtherExpense,
    Unknown,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CashDeposit => "Cash Deposit",
            Self::MoneyInIndividual => "Money In (Individual)",
            Self::MoneyInBusiness => "Money In (Business)",
            Self::LoanSavingsCredit => "Loan/Savings (Credit)",
            Self::OtherIncome => "Other Income",
            Self::MoneyTransferOutgoing => "Money Transfer (Outgoing)",
            Self::BuyGoods => "Buy Goods",
            Self::BillPayment => "Bill Payment",
            Self::PochiLaBiashara => "Pochi La Biashara",
            Self::Fuliza => "Fuliza",
            Self::CashWithdrawal => "Cash Withdrawal",
            Self::Airtime => "Airtime",
            Self::OtherExpense => "Other Expense",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Slot order of the money-in breakdown.
pub const INCOME_SLOTS: [Category; 5] = [
    Category::CashDeposit,
    Category::MoneyInIndividual,
    Category::MoneyInBusiness,
    Category::LoanSavingsCredit,
    Category::OtherIncome,
];

/// Slot order of the money-out breakdown.
pub const EXPENSE_SLOTS: [Category; 8] = [
    Category::MoneyTransferOutgoing,
    Category::BuyGoods,
    Category::BillPayment,
    Category::PochiLaBiashara,
    Category::Fuliza,
    Category::CashWithdrawal,
    Category::Airtime,
    Category::OtherExpense,
];

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A lower-case keyword looked up in one of the two text fields.
#[derive(Debug, Clone, Copy)]
enum Needle {
    Details(&'static str),
    Type(&'static str),
}

impl Needle {
    fn found(&self, details: &str, type_hint: &str) -> bool {
        match self {
            Self::Details(k) => details.contains(k),
            Self::Type(k) => type_hint.contains(k),
        }
    }
}

/// Matches when any clause matches; a clause matches when all of its needles do.
struct Rule {
    any_of: &'static [&'static [Needle]],
    category: Category,
}

impl Rule {
    fn matches(&self, details: &str, type_hint: &str) -> bool {
        self.any_of
            .iter()
            .any(|clause| clause.iter().all(|n| n.found(details, type_hint)))
    }
}

use Needle::{Details, Type};

// Checked top to bottom; overlapping keywords rely on this order.
const INFLOW_RULES: &[Rule] = &[
    Rule {
        any_of: &[&[Details("received from")], &[Type("received on")], &[Details("transfer from")]],
        category: Category::MoneyInIndividual,
    },
    Rule {
        any_of: &[&[Details("till")], &[Details("pay bill"), Type("received")]],
        category: Category::MoneyInBusiness,
    },
    Rule {
        any_of: &[&[Type("deposit")], &[Details("cash deposit")]],
        category: Category::CashDeposit,
    },
    Rule {
        any_of: &[
            &[Details("mshwari")],
            &[Details("kcb m-pesa")],
            &[Details("loan")],
            &[Type("mshwari")],
        ],
        category: Category::LoanSavingsCredit,
    },
];

const OUTFLOW_RULES: &[Rule] = &[
    Rule {
        any_of: &[&[Details("airtime")], &[Type("airtime purchase")]],
        category: Category::Airtime,
    },
    Rule {
        any_of: &[&[Type("pay bill")], &[Details("paid to")]],
        category: Category::BillPayment,
    },
    Rule {
        any_of: &[&[Type("buy goods")], &[Details("buy goods")]],
        category: Category::BuyGoods,
    },
    Rule {
        any_of: &[&[Type("send money")], &[Details("sent to")]],
        category: Category::MoneyTransferOutgoing,
    },
    Rule {
        any_of: &[&[Type("withdraw")], &[Details("withdrawal")]],
        category: Category::CashWithdrawal,
    },
    Rule {
        any_of: &[&[Details("fuliza")]],
        category: Category::Fuliza,
    },
    Rule {
        any_of: &[&[Details("pochi la biashara")], &[Type("pochi")]],
        category: Category::PochiLaBiashara,
    },
];

fn first_match(rules: &[Rule], details: &str, type_hint: &str) -> Option<Category> {
    rules
        .iter()
        .find(|r| r.matches(details, type_hint))
        .map(|r| r.category)
}

pub fn categorize(details: &str, type_hint: &str, amount: Option<f64>) -> Category {
    let details = details.to_lowercase();
    let type_hint = type_hint.to_lowercase();
    match amount {
        Some(a) if a > 0.0 => {
            first_match(INFLOW_RULES, &details, &type_hint).unwrap_or(Category::OtherIncome)
        }
        Some(a) if a < 0.0 => {
            first_match(OUTFLOW_RULES, &details, &type_hint).unwrap_or(Category::OtherExpense)
        }
        _ => Category::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airtime_purchase() {
        assert_eq!(categorize("Airtime Purchase", "", Some(-500.0)), Category::Airtime);
        assert_eq!(categorize("", "AIRTIME PURCHASE", Some(-20.0)), Category::Airtime);
    }

    #[test]
    fn test_funds_received_from_individual() {
        assert_eq!(
            categorize("Funds received from John", "", Some(1000.0)),
            Category::MoneyInIndividual
        );
    }

    #[test]
    fn test_zero_and_missing_amount_are_unknown() {
        assert_eq!(categorize("Airtime Purchase", "", Some(0.0)), Category::Unknown);
        assert_eq!(categorize("Airtime Purchase", "", None), Category::Unknown);
    }

    #[test]
    fn test_sign_selects_branch() {
        // "deposit" only counts on the inflow side.
        assert_eq!(categorize("Cash Deposit at Agent", "", Some(100.0)), Category::CashDeposit);
        assert_eq!(categorize("Cash Deposit at Agent", "", Some(-100.0)), Category::OtherExpense);
    }

    #[test]
    fn test_till_beats_deposit() {
        assert_eq!(
            categorize("Till 12345 cash deposit", "", Some(300.0)),
            Category::MoneyInBusiness
        );
    }

    #[test]
    fn test_pay_bill_inflow_needs_received_type() {
        assert_eq!(
            categorize("Pay Bill from Acme", "Received", Some(300.0)),
            Category::MoneyInBusiness
        );
        assert_eq!(categorize("Pay Bill from Acme", "", Some(300.0)), Category::OtherIncome);
    }

    #[test]
    fn test_loan_and_savings_credit() {
        assert_eq!(categorize("M-Shwari Loan", "", Some(500.0)), Category::LoanSavingsCredit);
        assert_eq!(categorize("", "MShwari Withdraw", Some(500.0)), Category::LoanSavingsCredit);
        assert_eq!(categorize("KCB M-PESA Transfer", "", Some(500.0)), Category::LoanSavingsCredit);
    }

    #[test]
    fn test_outflow_order() {
        assert_eq!(categorize("Merchant Payment", "Pay Bill", Some(-10.0)), Category::BillPayment);
        assert_eq!(categorize("Buy Goods at Naivas", "", Some(-10.0)), Category::BuyGoods);
        assert_eq!(categorize("Customer Transfer sent to Jane", "", Some(-10.0)), Category::MoneyTransferOutgoing);
        assert_eq!(categorize("Agent Withdrawal", "", Some(-10.0)), Category::CashWithdrawal);
        assert_eq!(categorize("OD Loan Repayment to Fuliza M-Pesa", "", Some(-10.0)), Category::Fuliza);
        assert_eq!(categorize("Pochi La Biashara payment", "", Some(-10.0)), Category::PochiLaBiashara);
        assert_eq!(categorize("Something else", "", Some(-10.0)), Category::OtherExpense);
    }

    #[test]
    fn test_airtime_wins_over_paid_to() {
        assert_eq!(categorize("Airtime paid to Safaricom", "", Some(-50.0)), Category::Airtime);
    }

    #[test]
    fn test_paid_to_wins_over_fuliza() {
        assert_eq!(categorize("Fuliza charge paid to agent", "", Some(-50.0)), Category::BillPayment);
    }

    #[test]
    fn test_unmatched_inflow_is_other_income() {
        assert_eq!(categorize("Reversal", "", Some(75.0)), Category::OtherIncome);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = INCOME_SLOTS
            .iter()
            .chain(EXPENSE_SLOTS.iter())
            .chain(std::iter::once(&Category::Unknown))
            .map(|c| c.label())
            .collect();
        let total = labels.len();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), total);
        assert_eq!(total, 14);
    }
}
