use shopfeed_scraper::registry;
use shopfeed_scraper::Template;

/// Prints every built-in template with its fetch flags.
pub(crate) fn run_templates() {
    println!("{:<12} {:<8} {:<16} {:<7} {}", "KEY", "RENDER", "API", "SCROLL", "NAME");
    for template in registry::templates() {
        println!("{}", template_row(template));
    }
}

fn template_row(template: &Template) -> String {
    let api = template
        .api
        .as_ref()
        .map_or_else(|| "-".to_owned(), |api| api.kind.to_string());
    format!(
        "{:<12} {:<8} {:<16} {:<7} {}",
        template.key,
        yes_no(template.requires_render),
        api,
        yes_no(template.infinite_scroll),
        template.display_name
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
