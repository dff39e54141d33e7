//! Sums, counts and distinct values over a user's expenses, used to build charts.
//!
//! Every function takes the ID of a user that has already been authenticated
//! and only ever reads that user's rows. None of them write to the database.
//!
//! Results that come back grouped are listed in the order the group first
//! appeared, i.e. sorted by the smallest expense ID in each group.
//!
//! A sum over zero rows is `None`, never zero. Series built from sums leave
//! such entries out rather than converting them.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{Error, expense::Amount, user::UserID};

/// The total spent on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTotal {
    /// The day the money was spent.
    pub date: Date,
    /// The exact sum of the day's expenses.
    pub total: Amount,
}

/// How a day's spending splits across categories.
///
/// `frequencies` and `totals` list the same categories in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    /// The number of expenses the user has ever recorded under each category.
    pub frequencies: Vec<(String, u64)>,
    /// The amount spent in each category on the day.
    pub totals: Vec<(String, Amount)>,
}

impl CategoryBreakdown {
    /// Whether no expenses were recorded on the day.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// The days on which `user_id` recorded at least one expense.
pub fn distinct_expense_dates(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Date>, Error> {
    connection
        .prepare(
            "SELECT date FROM expense
            WHERE user_id = ?1
            GROUP BY date
            ORDER BY MIN(id);",
        )?
        .query_map([user_id.as_i64()], |row| row.get(0))?
        .map(|maybe_date| maybe_date.map_err(|error| error.into()))
        .collect()
}

/// The exact amount `user_id` spent on `date`, or `None` if nothing was recorded that day.
pub fn total_expense_for_date(
    user_id: UserID,
    date: Date,
    connection: &Connection,
) -> Result<Option<Amount>, Error> {
    let cents: Option<i64> = connection.query_row(
        "SELECT SUM(amount) FROM expense WHERE user_id = ?1 AND date = ?2;",
        (user_id.as_i64(), date),
        |row| row.get(0),
    )?;

    Ok(cents.map(Amount::from_cents))
}

/// The total spent on each day that has expenses, in a single query.
///
/// Days without expenses are not filled in.
pub fn build_date_series(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<DateTotal>, Error> {
    let rows = connection
        .prepare(
            "SELECT date, SUM(amount) FROM expense
            WHERE user_id = ?1
            GROUP BY date
            ORDER BY MIN(id);",
        )?
        .query_map([user_id.as_i64()], |row| {
            let date: Date = row.get(0)?;
            let cents: Option<i64> = row.get(1)?;
            Ok((date, cents))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let series = rows
        .into_iter()
        .filter_map(|(date, cents)| {
            cents.map(|cents| DateTotal {
                date,
                total: Amount::from_cents(cents),
            })
        })
        .collect();

    Ok(series)
}

/// The categories `user_id` spent money on during `date`.
pub fn distinct_categories_for_date(
    user_id: UserID,
    date: Date,
    connection: &Connection,
) -> Result<Vec<String>, Error> {
    connection
        .prepare(
            "SELECT category FROM expense
            WHERE user_id = ?1 AND date = ?2
            GROUP BY category
            ORDER BY MIN(id);",
        )?
        .query_map((user_id.as_i64(), date), |row| row.get(0))?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// How many expenses `user_id` has ever recorded under `category`, on any date.
pub fn category_usage_count(
    user_id: UserID,
    category: &str,
    connection: &Connection,
) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM expense WHERE user_id = ?1 AND category = ?2;",
            (user_id.as_i64(), category),
            |row| read_count(row, 0),
        )
        .map_err(|error| error.into())
}

/// Read a `COUNT(*)` column. SQLite hands back counts as signed integers.
fn read_count(row: &Row, column: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(column)?;

    u64::try_from(count).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(column, count))
}

/// The exact amount `user_id` spent on `category` during `date`, or `None` if
/// there were no such expenses.
pub fn category_total_for_date(
    user_id: UserID,
    date: Date,
    category: &str,
    connection: &Connection,
) -> Result<Option<Amount>, Error> {
    let cents: Option<i64> = connection.query_row(
        "SELECT SUM(amount) FROM expense
        WHERE user_id = ?1 AND date = ?2 AND category = ?3;",
        (user_id.as_i64(), date, category),
        |row| row.get(0),
    )?;

    Ok(cents.map(Amount::from_cents))
}

/// Lifetime usage counts and the day's totals for each category used on `date`.
///
/// This is equivalent to calling [category_usage_count] and
/// [category_total_for_date] for every category from
/// [distinct_categories_for_date], but runs as one query.
pub fn build_category_breakdown(
    user_id: UserID,
    date: Date,
    connection: &Connection,
) -> Result<CategoryBreakdown, Error> {
    let rows = connection
        .prepare(
            "WITH lifetime AS (
                SELECT category, COUNT(*) AS uses FROM expense
                WHERE user_id = ?1
                GROUP BY category
            )
            SELECT e.category, SUM(e.amount), MAX(lifetime.uses)
            FROM expense e
            INNER JOIN lifetime ON lifetime.category = e.category
            WHERE e.user_id = ?1 AND e.date = ?2
            GROUP BY e.category
            ORDER BY MIN(e.id);",
        )?
        .query_map((user_id.as_i64(), date), |row| {
            let category: String = row.get(0)?;
            let cents: Option<i64> = row.get(1)?;
            let uses = read_count(row, 2)?;
            Ok((category, cents, uses))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let mut breakdown = CategoryBreakdown::default();

    for (category, cents, uses) in rows {
        let Some(cents) = cents else {
            continue;
        };

        breakdown.frequencies.push((category.clone(), uses));
        breakdown.totals.push((category, Amount::from_cents(cents)));
    }

    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{
            Amount, Category, Description, ExpenseFields, core::test_helpers::must_create_expense,
            delete_expense, update_expense,
        },
        user::test_helpers::must_create_user,
    };

    use super::{
        CategoryBreakdown, DateTotal, build_category_breakdown, build_date_series,
        category_total_for_date, category_usage_count, distinct_categories_for_date,
        distinct_expense_dates, read_count, total_expense_for_date,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn user_without_expenses_has_empty_dates_and_series() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);

        assert_eq!(distinct_expense_dates(user.id, &connection), Ok(vec![]));
        assert_eq!(build_date_series(user.id, &connection), Ok(vec![]));
    }

    #[test]
    fn total_for_date_without_expenses_is_absent() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);

        let total = total_expense_for_date(user.id, date!(2024 - 01 - 05), &connection);

        assert_eq!(total, Ok(None));
    }

    #[test]
    fn total_for_date_is_exact_sum() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 05);
        // 0.1 + 0.2 is not 0.3 in floating point.
        must_create_expense(user.id, "Food", "Gum", 10, day, &connection);
        must_create_expense(user.id, "Food", "Mint", 20, day, &connection);

        let total = total_expense_for_date(user.id, day, &connection).unwrap();

        assert_eq!(total, Some(Amount::from_cents(30)));
    }

    #[test]
    fn adding_expense_increases_total() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 05);
        must_create_expense(user.id, "Food", "Lunch", 1250, day, &connection);
        let before = total_expense_for_date(user.id, day, &connection).unwrap();

        must_create_expense(user.id, "Food", "Snack", 1, day, &connection);

        let after = total_expense_for_date(user.id, day, &connection).unwrap();
        assert!(after > before, "want {after:?} > {before:?}");
    }

    #[test]
    fn adding_zero_expense_leaves_total_unchanged() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 05);
        must_create_expense(user.id, "Food", "Lunch", 1250, day, &connection);
        let before = total_expense_for_date(user.id, day, &connection).unwrap();

        must_create_expense(user.id, "Food", "Free sample", 0, day, &connection);

        let after = total_expense_for_date(user.id, day, &connection).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn dates_and_series_are_in_first_insertion_order() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        must_create_expense(user.id, "Food", "Lunch", 1250, date!(2024 - 01 - 07), &connection);
        must_create_expense(user.id, "Food", "Lunch", 1000, date!(2024 - 01 - 05), &connection);
        must_create_expense(user.id, "Food", "Dinner", 500, date!(2024 - 01 - 07), &connection);

        let dates = distinct_expense_dates(user.id, &connection).unwrap();
        let series = build_date_series(user.id, &connection).unwrap();

        assert_eq!(dates, vec![date!(2024 - 01 - 07), date!(2024 - 01 - 05)]);
        assert_eq!(
            series,
            vec![
                DateTotal {
                    date: date!(2024 - 01 - 07),
                    total: Amount::from_cents(1750)
                },
                DateTotal {
                    date: date!(2024 - 01 - 05),
                    total: Amount::from_cents(1000)
                },
            ]
        );
    }

    #[test]
    fn series_totals_match_per_date_totals() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        must_create_expense(user.id, "Food", "Lunch", 1250, date!(2024 - 01 - 05), &connection);
        must_create_expense(user.id, "Transit", "Bus", 275, date!(2024 - 01 - 05), &connection);
        must_create_expense(user.id, "Food", "Lunch", 1100, date!(2024 - 01 - 06), &connection);

        let series = build_date_series(user.id, &connection).unwrap();

        for DateTotal { date, total } in series {
            let want = total_expense_for_date(user.id, date, &connection).unwrap();
            assert_eq!(Some(total), want, "totals differ for {date}");
        }
    }

    #[test]
    fn usage_count_ignores_date() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        must_create_expense(user.id, "Food", "Lunch", 1250, date!(2024 - 01 - 05), &connection);
        must_create_expense(user.id, "Food", "Lunch", 1100, date!(2024 - 01 - 06), &connection);
        must_create_expense(user.id, "Transit", "Bus", 275, date!(2024 - 01 - 06), &connection);

        assert_eq!(category_usage_count(user.id, "Food", &connection), Ok(2));
        assert_eq!(category_usage_count(user.id, "Transit", &connection), Ok(1));
        assert_eq!(category_usage_count(user.id, "Rent", &connection), Ok(0));
    }

    #[test]
    fn count_column_reads_signed_sqlite_integer() {
        let connection = get_test_db_connection();

        let count = connection
            .query_row("SELECT COUNT(*) FROM (VALUES (1), (2), (3));", [], |row| {
                read_count(row, 0)
            })
            .unwrap();

        assert_eq!(count, 3);
    }

    #[test]
    fn negative_count_column_is_out_of_range() {
        let connection = get_test_db_connection();

        let result = connection.query_row("SELECT -1;", [], |row| read_count(row, 0));

        assert!(
            matches!(result, Err(rusqlite::Error::IntegralValueOutOfRange(0, -1))),
            "got {result:?}"
        );
    }

    #[test]
    fn deleting_expense_updates_aggregates() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let first_day = date!(2024 - 01 - 05);
        let second_day = date!(2024 - 01 - 06);
        must_create_expense(user.id, "Food", "Lunch", 1250, first_day, &connection);
        must_create_expense(user.id, "Food", "Coffee", 450, first_day, &connection);
        let dinner = must_create_expense(user.id, "Food", "Dinner", 3000, second_day, &connection);
        let food_count_before = category_usage_count(user.id, "Food", &connection).unwrap();

        delete_expense(dinner.id, &connection).unwrap();

        assert_eq!(
            category_usage_count(user.id, "Food", &connection),
            Ok(food_count_before - 1)
        );
        assert_eq!(
            total_expense_for_date(user.id, second_day, &connection),
            Ok(None)
        );
        assert_eq!(
            distinct_expense_dates(user.id, &connection),
            Ok(vec![first_day])
        );
    }

    #[test]
    fn deleting_expense_removes_its_amount_from_total() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 05);
        must_create_expense(user.id, "Food", "Lunch", 1250, day, &connection);
        let coffee = must_create_expense(user.id, "Food", "Coffee", 450, day, &connection);

        delete_expense(coffee.id, &connection).unwrap();

        assert_eq!(
            total_expense_for_date(user.id, day, &connection),
            Ok(Some(Amount::from_cents(1250)))
        );
        assert_eq!(distinct_expense_dates(user.id, &connection), Ok(vec![day]));
    }

    #[test]
    fn changing_category_moves_usage_count() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 05);
        must_create_expense(user.id, "Food", "Lunch", 1250, day, &connection);
        let coffee = must_create_expense(user.id, "Food", "Coffee", 450, day, &connection);
        let fields = ExpenseFields {
            category: Category::new_unchecked("Treats"),
            description: Description::new_unchecked("Coffee"),
            amount: Amount::from_cents(500),
        };

        update_expense(coffee.id, &fields, &connection).unwrap();

        assert_eq!(category_usage_count(user.id, "Food", &connection), Ok(1));
        assert_eq!(category_usage_count(user.id, "Treats", &connection), Ok(1));
        assert_eq!(
            total_expense_for_date(user.id, day, &connection),
            Ok(Some(Amount::from_cents(1750)))
        );
    }

    #[test]
    fn breakdown_for_lunch_and_bus() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 05);
        must_create_expense(user.id, "Food", "Lunch", 1250, day, &connection);
        must_create_expense(user.id, "Transit", "Bus", 275, day, &connection);

        let breakdown = build_category_breakdown(user.id, day, &connection).unwrap();

        assert_eq!(
            breakdown,
            CategoryBreakdown {
                frequencies: vec![("Food".to_owned(), 1), ("Transit".to_owned(), 1)],
                totals: vec![
                    ("Food".to_owned(), Amount::from_cents(1250)),
                    ("Transit".to_owned(), Amount::from_cents(275)),
                ],
            }
        );
    }

    #[test]
    fn breakdown_matches_per_category_queries() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        let day = date!(2024 - 01 - 06);
        must_create_expense(user.id, "Food", "Lunch", 1250, date!(2024 - 01 - 05), &connection);
        must_create_expense(user.id, "Transit", "Bus", 275, day, &connection);
        must_create_expense(user.id, "Food", "Dinner", 2000, day, &connection);
        must_create_expense(user.id, "Transit", "Train", 510, day, &connection);

        let breakdown = build_category_breakdown(user.id, day, &connection).unwrap();

        let categories = distinct_categories_for_date(user.id, day, &connection).unwrap();
        assert_eq!(categories, vec!["Transit".to_owned(), "Food".to_owned()]);
        let want_frequencies: Vec<(String, u64)> = categories
            .iter()
            .map(|category| {
                let count = category_usage_count(user.id, category, &connection).unwrap();
                (category.clone(), count)
            })
            .collect();
        let want_totals: Vec<(String, Amount)> = categories
            .iter()
            .map(|category| {
                let total = category_total_for_date(user.id, day, category, &connection)
                    .unwrap()
                    .unwrap();
                (category.clone(), total)
            })
            .collect();
        assert_eq!(breakdown.frequencies, want_frequencies);
        assert_eq!(breakdown.totals, want_totals);
        assert_eq!(breakdown.frequencies[1], ("Food".to_owned(), 2));
    }

    #[test]
    fn breakdown_for_empty_date_is_empty() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);

        let breakdown = build_category_breakdown(user.id, date!(2024 - 01 - 05), &connection);

        assert_eq!(breakdown, Ok(CategoryBreakdown::default()));
    }

    #[test]
    fn category_total_without_matches_is_absent() {
        let connection = get_test_db_connection();
        let user = must_create_user("alice", &connection);
        must_create_expense(user.id, "Food", "Lunch", 1250, date!(2024 - 01 - 05), &connection);

        let total =
            category_total_for_date(user.id, date!(2024 - 01 - 05), "Transit", &connection);

        assert_eq!(total, Ok(None));
    }

    #[test]
    fn other_users_expenses_are_ignored() {
        let connection = get_test_db_connection();
        let alice = must_create_user("alice", &connection);
        let bob = must_create_user("bobby", &connection);
        let day = date!(2024 - 01 - 05);
        must_create_expense(alice.id, "Food", "Lunch", 1250, day, &connection);
        must_create_expense(bob.id, "Food", "Lunch", 9999, day, &connection);
        must_create_expense(bob.id, "Rent", "Rent", 50000, day, &connection);
        must_create_expense(bob.id, "Food", "Dinner", 100, date!(2024 - 01 - 09), &connection);

        assert_eq!(distinct_expense_dates(alice.id, &connection), Ok(vec![day]));
        assert_eq!(
            total_expense_for_date(alice.id, day, &connection),
            Ok(Some(Amount::from_cents(1250)))
        );
        assert_eq!(category_usage_count(alice.id, "Food", &connection), Ok(1));
        assert_eq!(
            build_category_breakdown(alice.id, day, &connection),
            Ok(CategoryBreakdown {
                frequencies: vec![("Food".to_owned(), 1)],
                totals: vec![("Food".to_owned(), Amount::from_cents(1250))],
            })
        );
    }
}
