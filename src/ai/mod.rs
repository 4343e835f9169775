//! AI helpers: keyword based transaction categorization and the Gemini
//! client used for financial advice.

mod gemini;

pub use gemini::{ExpenseAnalysis, GeminiClient};

/// The category used when no keywords match a description.
pub const OTHER_CATEGORY: &str = "Other";

/// Maps each category to the keywords that suggest it.
///
/// Listed in priority order: when two categories score the same number of
/// keyword matches, the one listed first wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Food",
        &[
            "lunch", "dinner", "breakfast", "food", "restaurant", "cafe", "pizza", "coffee",
            "grocery", "groceries", "supermarket", "takeout", "delivery", "uber eats", "doordash",
            "snacks", "bakery", "ice cream", "boba", "tea", "bar", "drink", "steakhouse", "burger",
            "fast food", "sandwich", "sushi", "catering", "farmers market", "produce", "pastries",
            "convenience store", "whole foods",
        ],
    ),
    (
        "Transportation",
        &[
            "uber", "taxi", "ride", "gas", "fuel", "parking", "bus", "train", "metro", "transport",
            "lyft", "rapido", "ola", "grab", "auto", "bike", "scooter", "airport", "toll",
            "maintenance", "oil", "tires", "rental car", "bike taxi", "bike share",
            "scooter rental", "car service", "motorcycle", "vehicle",
        ],
    ),
    (
        "Entertainment",
        &[
            "movie", "cinema", "netflix", "spotify", "concert", "game", "novel", "book", "disney",
            "hulu", "bowling", "arcade", "museum", "theater", "audible", "streaming",
            "subscription", "steam", "kindle", "hbo", "play", "ticket", "audiobooks",
        ],
    ),
    (
        "Shopping",
        &[
            "amazon", "mall", "shopping", "clothing", "shoes", "electronics", "store", "laptop",
            "furniture", "ikea", "decor", "gift", "sports", "pet", "tools", "boutique", "retail",
            "jeans", "target", "best buy", "home depot", "petco", "dicks",
        ],
    ),
    (
        "Utilities",
        &[
            "electric", "water", "internet", "phone", "bill", "wifi", "broadband", "gas bill",
            "trash", "sewage", "mobile data", "security system", "cable", "isp", "provider",
            "verizon", "at&t", "adt",
        ],
    ),
    (
        "Healthcare",
        &[
            "doctor", "pharmacy", "hospital", "dental", "therapy", "vaccine", "eye exam",
            "vitamins", "physical therapy", "emergency", "insurance", "chiropractor", "clinic",
            "medicine", "prescription", "optician", "supplements", "co-pay",
        ],
    ),
    (
        "Education",
        &[
            "tuition", "college", "course", "workshop", "textbook", "books", "learning",
            "student loan", "school", "stationery", "udemy", "bootcamp", "duolingo", "training",
            "seminar", "coding", "language", "supplies",
        ],
    ),
    (
        "Travel",
        &[
            "hotel", "flight", "airbnb", "vacation", "resort", "airport", "souvenir",
            "travel insurance", "visa", "baggage", "tour", "airline", "parking", "accommodation",
            "trip",
        ],
    ),
    (
        "Personal Care",
        &[
            "gym", "fitness", "salon", "haircut", "spa", "massage", "beauty", "makeup", "skincare",
            "cosmetics", "shampoo", "yoga", "barber", "manicure", "pedicure", "sephora", "ulta",
        ],
    ),
    (
        "Savings",
        &[
            "savings", "transfer", "investment", "stocks", "mutual fund", "brokerage", "vanguard",
            "fidelity", "etrade", "emergency fund", "deposit", "earned", "income", "buy stocks",
            "invest", "save", "earning",
        ],
    ),
    (
        "Bills & Subscriptions",
        &[
            "rent", "mortgage", "insurance", "premium", "subscription", "membership",
            "loan payment", "car insurance", "hoa", "credit card", "prime", "dropbox", "renewal",
            "annual fee", "installment", "dues",
        ],
    ),
];

/// Suggest a category for a transaction based on its description.
///
/// Each category scores one point per keyword that appears in the
/// description, matched case-insensitively as a substring. The category with
/// the highest score wins, and `"Other"` is returned when nothing matches.
pub fn categorize(description: &str) -> &'static str {
    if description.trim().is_empty() {
        return OTHER_CATEGORY;
    }

    let description = description.to_lowercase();

    let mut best_category = OTHER_CATEGORY;
    let mut best_score = 0;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords
            .iter()
            .filter(|keyword| description.contains(*keyword))
            .count();

        if score > best_score {
            best_category = category;
            best_score = score;
        }
    }

    best_category
}
