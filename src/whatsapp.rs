//! WhatsApp deep links. Checkout never happens on the site itself: every
//! "buy" button resolves to a `wa.me` link with a prefilled message in the
//! visitor's language.

use serde::Deserialize;

use crate::normalization::phone::normalize_whatsapp;

/// Interface language of the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ar,
    En,
}

/// Message for buying a product tier (game currency, gift card, subscription).
pub fn order_message(lang: Lang, item_name: &str, tier_label: &str) -> String {
    match lang {
        Lang::Ar => format!("مرحباً، أريد شراء {item_name} - {tier_label}"),
        Lang::En => format!("Hi, I want to buy {item_name} - {tier_label}"),
    }
}

/// Message for ordering a social-media boost.
pub fn service_message(lang: Lang, service_name: &str, tier_label: &str) -> String {
    match lang {
        Lang::Ar => format!(
            "مرحباً سلاموي، أريد طلب {service_name} - {tier_label}. هل يمكنك إخباري عن السعر؟"
        ),
        Lang::En => format!(
            "Hello Salamawy, I want to order {service_name} - {tier_label}. Can you tell me about the price?"
        ),
    }
}

/// Message behind the "can't find what you need?" button.
pub fn inquiry_message(lang: Lang) -> &'static str {
    match lang {
        Lang::Ar => "مرحباً، هل Discord Nitro أو بطاقة أخرى متوفرة الآن؟",
        Lang::En => "Hi, is Discord Nitro or another card available right now?",
    }
}

/// `https://wa.me/<digits>?text=<message>` with the message percent-encoded.
pub fn deep_link(number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        normalize_whatsapp(number),
        urlencoding::encode(message)
    )
}
