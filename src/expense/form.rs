//! The form for entering the details of an expense.

use maud::{Markup, html};

use crate::{
    expense::{
        ExpenseForm,
        domain::{CATEGORY_MAX_LENGTH, DESCRIPTION_MAX_LENGTH},
    },
    html::{INPUT_STYLE, LABEL_STYLE, submit_button},
};

/// The largest amount the form lets through, matching what [Amount] accepts.
///
/// [Amount]: crate::expense::Amount
const MAX_AMOUNT: &str = "9999999999.99";

/// How the expense form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormAction<'a> {
    /// POST a new expense to the endpoint.
    Create(&'a str),
    /// PUT the new details of an existing expense to the endpoint.
    Update(&'a str),
}

/// The expense form, pre-filled with `values`. Rejections from the server
/// land in the alert container.
pub(crate) fn expense_form(action: FormAction<'_>, values: &ExpenseForm) -> Markup {
    let (hx_post, hx_put, heading, submit) = match action {
        FormAction::Create(url) => (Some(url), None, "New Expense", "Add Expense"),
        FormAction::Update(url) => (None, Some(url), "Edit Expense", "Save Changes"),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { (heading) }

            div {
                label for="category" class=(LABEL_STYLE) { "Category" }
                input id="category" name="category" type="text" placeholder="Food"
                    maxlength=(CATEGORY_MAX_LENGTH) value=(values.category)
                    class=(INPUT_STYLE) required autofocus;
            }

            div {
                label for="description" class=(LABEL_STYLE) { "Description" }
                input id="description" name="description" type="text" placeholder="Lunch"
                    maxlength=(DESCRIPTION_MAX_LENGTH) value=(values.description)
                    class=(INPUT_STYLE) required;
            }

            div {
                label for="amount" class=(LABEL_STYLE) { "Amount" }
                div class="currency w-full" {
                    input id="amount" name="amount" type="number" step="0.01" min="0"
                        max=(MAX_AMOUNT) placeholder="0.00" value=(values.amount)
                        class=(INPUT_STYLE) required;
                }
            }

            (submit_button(submit))
        }
    }
}
