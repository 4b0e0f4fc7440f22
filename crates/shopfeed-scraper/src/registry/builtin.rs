//! Built-in source templates for Thai storefronts.

use std::borrow::Cow;
use std::sync::LazyLock;

use crate::template::{ApiBinding, ApiKind, Template};

pub const SHOPEE_SEARCH_ENDPOINT: &str = "https://shopee.co.th/api/v4/search/search_items";
pub const LAZADA_CATALOG_ENDPOINT: &str = "https://www.lazada.co.th/catalog/";

fn generic() -> Template {
    Template {
        key: "generic",
        display_name: "Generic Product Page",
        container: ".product, .product-card, .product-item, [data-product]",
        id_selectors: &[".sku", ".product-sku", "[data-sku]", ".product-code"],
        name_selectors: &[".product-name", ".product-title", "h3", "h4", ".name", ".title"],
        price_selectors: &[".price", ".product-price", ".amount", "[data-price]"],
        discount_selectors: &[".discount", ".sale", ".promo", ".old-price", "del"],
        image_selectors: &["img"],
        ..Template::BASE
    }
}

fn lnwshop() -> Template {
    Template {
        key: "lnwshop",
        display_name: "LnwShop (lnwshop.com)",
        container: ".product-item, .product-box, .product-card, .productItem, .item-product, \
                    [class*='product-'], [class*='Product'], .product-list-item, .product_item",
        id_selectors: &[".product-code", ".sku", "[data-sku]", "[data-product-id]"],
        name_selectors: &[
            ".product-name",
            ".product-title",
            ".productName",
            "h3",
            "h4",
            "h2",
            "a.product-name",
            ".item-name",
        ],
        price_selectors: &[
            ".product-price",
            ".price",
            ".productPrice",
            ".price-current",
            ".sell-price",
            ".sale-price",
            "span.price",
            "[class*='price']",
        ],
        discount_selectors: &[
            ".product-price-old",
            ".old-price",
            ".price-old",
            "del",
            "s",
            ".original-price",
            ".before-price",
        ],
        image_selectors: &["img.product-img", "img.product-image", "img"],
        group_selectors: &[".product-category", ".category-name", ".breadcrumb li:last-child"],
        next_page_selectors: &[".pagination .next a", "a.page-next", ".paging .next a"],
        ..Template::BASE
    }
}

fn shopee() -> Template {
    Template {
        key: "shopee",
        display_name: "Shopee Thailand (shopee.co.th)",
        container: "[data-sqe='item'], .shopee-search-item-result__item, .col-xs-2-4, \
                    [class*='product-card'], li.search-item-result, div[data-index]",
        id_selectors: &["[data-item-id]", "[data-product-id]"],
        name_selectors: &[
            "[data-sqe='name']",
            ".ie3A\\+n",
            ".Cve6sh",
            ".line-clamp-2",
            "[class*='product-name']",
            ".product-name",
            "div[class*='name'] span",
        ],
        price_selectors: &[
            "[data-sqe='price']",
            ".ZEgDH9",
            "._1xk7ak",
            "._341bF0",
            "span[class*='price']",
            "[class*='price-current']",
            ".price span",
        ],
        discount_selectors: &[
            ".percent",
            "._218_dR",
            "[class*='discount']",
            ".discount-tag",
            "span[class*='discount']",
        ],
        image_selectors: &["img[class*='product']", "img._3-N5L1", "img[data-src]", "img"],
        group_selectors: &[
            ".shopee-category-list__selected",
            "[class*='category'] a.active",
        ],
        next_page_selectors: &[".shopee-mini-page-controller__next-btn"],
        requires_render: true,
        api: Some(ApiBinding {
            kind: ApiKind::ShopeeSearch,
            endpoint: Cow::Borrowed(SHOPEE_SEARCH_ENDPOINT),
        }),
        wait_for: &["[data-sqe='item']", ".col-xs-2-4", "[class*='product-card']"],
        infinite_scroll: true,
        ..Template::BASE
    }
}

fn lazada() -> Template {
    Template {
        key: "lazada",
        display_name: "Lazada Thailand (lazada.co.th)",
        container: "[data-qa-locator='product-item'], .Bm3ON, .ant-card, [class*='product-card'], \
                    div[data-tracking='product-card'], .gridItem, .card-product",
        id_selectors: &["[data-item-id]", "[data-product-id]", "[data-sku]"],
        name_selectors: &[
            ".RfADt a",
            "[class*='product-title']",
            ".product-title",
            "a[title]",
            "h2",
            "h3",
        ],
        price_selectors: &[
            ".ooOxS span",
            "._3PUKe span",
            "[class*='price-current']",
            ".price-current",
            "span.currency",
        ],
        discount_selectors: &[
            ".WNoq3",
            "[class*='discount']",
            ".sale-tag",
            "span[class*='discount']",
        ],
        image_selectors: &["img.jBwCF", "img[data-src]", "img[class*='product']", "img"],
        group_selectors: &[".breadcrumb li:last-child", "[class*='category-name']"],
        next_page_selectors: &[".ant-pagination-next a", "a[class*='next-page']"],
        requires_render: true,
        api: Some(ApiBinding {
            kind: ApiKind::LazadaCatalog,
            endpoint: Cow::Borrowed(LAZADA_CATALOG_ENDPOINT),
        }),
        wait_for: &["[data-qa-locator='product-item']", ".Bm3ON", ".gridItem"],
        infinite_scroll: true,
        ..Template::BASE
    }
}

fn lotuss() -> Template {
    Template {
        key: "lotuss",
        display_name: "Lotus's Shop Online (lotuss.com)",
        container: "[class*='product-card'], [class*='ProductCard'], .product-item, .product-tile, \
                    [data-testid*='product'], div[class*='Item'], .item-card",
        id_selectors: &["[data-product-id]", "[data-sku]", ".product-code"],
        name_selectors: &[
            "[class*='product-name']",
            "[class*='ProductName']",
            "[data-testid*='name']",
            ".product-title",
            "h3",
            "h4",
            "a[class*='product-link']",
            "span[class*='name']",
        ],
        price_selectors: &[
            "[class*='product-price']",
            "[class*='Price']",
            "[data-testid*='price']",
            ".price",
            "span.price",
            "[class*='selling-price']",
        ],
        discount_selectors: &[
            "[class*='original-price']",
            "[class*='was-price']",
            "del",
            "s",
            "[class*='discount']",
            "[class*='save-price']",
        ],
        image_selectors: &["img[class*='product']", "img[data-src]", "img"],
        group_selectors: &[
            "[class*='breadcrumb'] li:last-child",
            "[class*='category-name']",
        ],
        next_page_selectors: &["a[class*='next']", "button[class*='next']"],
        requires_render: true,
        wait_for: &["[class*='product-card']", "[class*='ProductCard']", ".product-item"],
        infinite_scroll: true,
        ..Template::BASE
    }
}

fn banana() -> Template {
    Template {
        key: "banana",
        display_name: "BaNANA Online (bnn.in.th)",
        container: "[class*='product-card'], [class*='ProductCard'], .product-item, \
                    .product-grid-item, [data-product], .product-listing-item, [class*='product-box']",
        id_selectors: &["[data-sku]", "[data-product-id]", ".product-sku"],
        name_selectors: &[
            "[class*='product-name']",
            "[class*='ProductName']",
            ".product-title",
            "h3",
            "h4",
            "a[class*='product-link']",
            ".product-card__name",
            "[class*='product-info'] h3",
        ],
        price_selectors: &[
            "[class*='product-price']",
            "[class*='price-current']",
            "[class*='selling-price']",
            ".price",
            ".product-price",
            "span[class*='price'] span",
        ],
        discount_selectors: &[
            "[class*='original-price']",
            "[class*='was-price']",
            "[class*='price-original']",
            "del",
            "s",
        ],
        image_selectors: &[
            "img[class*='product']",
            "img[data-src]",
            "img[loading='lazy']",
            "img",
        ],
        group_selectors: &[
            ".breadcrumb li:last-child a",
            "[class*='breadcrumb'] li:nth-last-child(2)",
            "[class*='category']",
        ],
        next_page_selectors: &["a[class*='next']", "a[rel='next']", ".pagination .next a"],
        requires_render: true,
        wait_for: &["[class*='product-card']", ".product-item", "[class*='ProductCard']"],
        ..Template::BASE
    }
}

fn jib() -> Template {
    Template {
        key: "jib",
        display_name: "JIB Online (jib.co.th)",
        container: "[class*='product-item'], [class*='productItem'], .product-box, .product-card, \
                    [class*='item-product'], .jib-product, div[class*='product-list'] > div",
        id_selectors: &[
            "[class*='product-code']",
            ".sku",
            "[data-sku]",
            "[class*='item-code']",
            "span[class*='code']",
        ],
        name_selectors: &[
            "[class*='product-name']",
            "[class*='productName']",
            ".product-title",
            "h3",
            "h4",
            "a[class*='product-link']",
            "a[title]",
        ],
        price_selectors: &[
            "[class*='product-price']",
            "[class*='price-sell']",
            "[class*='price-current']",
            ".price",
            ".price-normal",
            "span[class*='price']",
        ],
        discount_selectors: &[
            "[class*='price-old']",
            "[class*='price-origin']",
            "[class*='original-price']",
            "del",
            "s",
            "[class*='discount']",
        ],
        image_selectors: &[
            "img[class*='product']",
            "img[data-src]",
            "img[loading='lazy']",
            "img",
        ],
        group_selectors: &[
            ".breadcrumb li:last-child a",
            "[class*='category-name']",
            "[class*='breadcrumb'] a:last-of-type",
        ],
        next_page_selectors: &["a[class*='next']", "a[rel='next']", ".pagination .next a"],
        requires_render: true,
        wait_for: &["[class*='product-item']", ".product-box", ".product-card"],
        ..Template::BASE
    }
}

fn bigc() -> Template {
    Template {
        key: "bigc",
        display_name: "BigC Online (bigc.co.th)",
        container: "[class*='product-card'], [class*='ProductCard'], .product-item, .product-tile, \
                    [data-testid*='product'], [class*='item-card']",
        id_selectors: &["[data-product-id]", "[data-sku]", "[data-item-id]"],
        name_selectors: &[
            "[class*='product-name']",
            "[class*='ProductName']",
            "[data-testid*='name']",
            ".product-title",
            "h3",
            "h4",
            "a[class*='product-link']",
        ],
        price_selectors: &[
            "[class*='product-price']",
            "[class*='Price']",
            "[data-testid*='price']",
            ".price",
            "span.price",
        ],
        discount_selectors: &[
            "[class*='original-price']",
            "[class*='was-price']",
            "[class*='old-price']",
            "del",
            "s",
            "[class*='discount']",
        ],
        image_selectors: &["img[class*='product']", "img[data-src]", "img"],
        group_selectors: &[
            "[class*='breadcrumb'] li:last-child",
            "[class*='category-name']",
        ],
        next_page_selectors: &["a[class*='next']", "button[class*='next']"],
        requires_render: true,
        wait_for: &["[class*='product-card']", "[class*='ProductCard']", ".product-item"],
        infinite_scroll: true,
        ..Template::BASE
    }
}

fn woocommerce() -> Template {
    Template {
        key: "woocommerce",
        display_name: "WooCommerce",
        container: ".products .product, ul.products li.product",
        name_selectors: &[".woocommerce-loop-product__title", "h2"],
        price_selectors: &[".price ins .amount", ".price .amount"],
        discount_selectors: &[".price del .amount"],
        image_selectors: &[".attachment-woocommerce_thumbnail", "img"],
        next_page_selectors: &[".next.page-numbers"],
        ..Template::BASE
    }
}

fn table() -> Template {
    Template {
        key: "table",
        display_name: "HTML Table Layout",
        container: "table tbody tr, .table tbody tr",
        id_selectors: &["td:nth-child(1)", "td.sku"],
        name_selectors: &["td:nth-child(2)", "td.name"],
        price_selectors: &["td:nth-child(3)", "td.price"],
        discount_selectors: &["td:nth-child(4)", "td.discount"],
        image_selectors: &["td img"],
        ..Template::BASE
    }
}

pub(super) static TEMPLATES: LazyLock<[Template; 10]> = LazyLock::new(|| {
    [
        generic(),
        lnwshop(),
        shopee(),
        lazada(),
        lotuss(),
        banana(),
        jib(),
        bigc(),
        woocommerce(),
        table(),
    ]
});

/// Short names and domains accepted in place of a template key.
pub(super) const ALIASES: &[(&str, &str)] = &[
    ("lnw", "lnwshop"),
    ("lnwshop.com", "lnwshop"),
    ("shopee.co.th", "shopee"),
    ("lazada.co.th", "lazada"),
    ("lotus", "lotuss"),
    ("lotuss.com", "lotuss"),
    ("bnn", "banana"),
    ("bnn.in.th", "banana"),
    ("jib.co.th", "jib"),
    ("bigc.co.th", "bigc"),
    ("woo", "woocommerce"),
];

/// Hostname substrings checked in order; the first hit wins.
pub(super) const HOST_PATTERNS: &[(&str, &str)] = &[
    ("lnwshop", "lnwshop"),
    ("shopee", "shopee"),
    ("lazada", "lazada"),
    ("lotuss", "lotuss"),
    ("lotus", "lotuss"),
    ("bnn.in.th", "banana"),
    ("banana", "banana"),
    ("jib.co.th", "jib"),
    ("jib", "jib"),
    ("bigc", "bigc"),
];
