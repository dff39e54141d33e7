//! The navigation bar: a row of links across the top on wide screens, and a
//! tab bar pinned to the bottom on phones.

use maud::{Markup, html};

use crate::endpoints;

const DESKTOP_LINK: &str = "block px-3 py-2 rounded-sm text-gray-900 dark:text-white \
    hover:text-blue-700 lg:p-0 aria-[current=page]:text-blue-700 \
    dark:aria-[current=page]:text-blue-500";

const MOBILE_LINK: &str = "flex w-full items-center justify-center rounded-lg px-2.5 py-2 \
    text-xs font-semibold text-gray-600 dark:text-gray-300 hover:text-blue-700 \
    aria-[current=page]:bg-blue-50 aria-[current=page]:text-blue-700 \
    dark:aria-[current=page]:bg-blue-900/30 dark:aria-[current=page]:text-blue-200";

fn links<'a>(today: &'a str) -> [(&'a str, &'static str); 3] {
    [
        (endpoints::OVERVIEW_PAGE, "Overview"),
        (today, "Today"),
        (endpoints::LOG_OUT_API, "Log out"),
    ]
}

/// `current` is the URL of the page being rendered, and its link is marked
/// with `aria-current="page"`. `today` is the day page for the local date.
pub fn nav_bar(current: &str, today: &str) -> Markup {
    let links = links(today);
    let is_current = |url: &str| (url == current).then_some("page");

    html! {
        nav class="bg-white dark:bg-gray-900" {
            div class="mx-auto flex max-w-screen-xl items-center justify-between p-4" {
                a href=(endpoints::ROOT) class="text-2xl font-semibold dark:text-white" { "Outlay" }

                ul class="hidden lg:flex lg:space-x-8 font-medium" {
                    @for (url, title) in links {
                        li { a href=(url) class=(DESKTOP_LINK) aria-current=[is_current(url)] { (title) } }
                    }
                }
            }
        }

        nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden" aria-label="Primary" {
            ul class="mx-4 mb-4 grid grid-cols-3 gap-2 rounded-xl border bg-white/95 px-4 py-3 shadow-lg dark:bg-gray-900/95" {
                @for (url, title) in links {
                    li { a href=(url) class=(MOBILE_LINK) aria-current=[is_current(url)] { (title) } }
                }
            }
        }
    }
}
