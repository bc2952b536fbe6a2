use crate::api::models::*;
use crate::storage::Food;
use axum::{extract::State, response::Html};

/// Escape text for interpolation into HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(site: &str, title: &str, body: &str) -> Html<String> {
    let site = escape(site);
    let title = escape(title);
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | {site}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <header>
    <a class="brand" href="/">{site}</a>
    <nav>
      <a href="/categories">Categories</a>
      <a href="/feedback">Feedback</a>
      <a href="/bulk">Bulk Orders</a>
      <a href="/enter_address">Cart (<span id="cart-count">0</span>)</a>
    </nav>
  </header>
  <main>
{body}
  </main>
  <script src="/static/script.js"></script>
</body>
</html>
"#
    ))
}

fn food_card(food: &Food) -> String {
    let name = escape(&food.name);
    let category = escape(food.category.as_str());
    let image = food
        .image
        .as_deref()
        .map(|image| format!(r#"<img src="/static/images/{}" alt="{name}">"#, escape(image)))
        .unwrap_or_default();
    format!(
        r#"    <article class="item" data-id="{id}" data-category="{category}">{image}<h3>{name}</h3><span class="badge">{category}</span><p>{description}</p><strong>&#8377;{price}</strong><button class="add-to-cart" data-id="{id}">Add to cart</button></article>
"#,
        id = food.id,
        description = escape(food.description.as_deref().unwrap_or("")),
        price = food.price,
    )
}

pub async fn home_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let foods = state.db.list_foods().await?;

    let mut body = String::from(
        r#"    <input id="search" type="search" placeholder="Search dishes..." autocomplete="off">
    <ul id="suggestions"></ul>
    <section id="items">
"#,
    );
    for food in &foods {
        body.push_str(&food_card(food));
    }
    body.push_str("    </section>");

    Ok(layout(&state.config.site.name, "Menu", &body))
}

pub async fn categories_page(State(state): State<AppState>) -> Html<String> {
    let body = r#"    <div class="chips">
      <button class="chip active" id="chip-All" onclick="filterBy('All')">All</button>
      <button class="chip" id="chip-Veg" onclick="filterBy('Veg')">Veg</button>
      <button class="chip" id="chip-Non-Veg" onclick="filterBy('Non-Veg')">Non-Veg</button>
      <button class="chip" id="chip-Bulk" onclick="filterBy('Bulk')">Bulk</button>
    </div>
    <section id="items"></section>"#;
    layout(&state.config.site.name, "Categories", body)
}

pub async fn feedback_page(State(state): State<AppState>) -> Html<String> {
    let body = r#"    <form id="review-form">
      <select id="rev-food"><option value="">General</option></select>
      <input id="rev-name" placeholder="Your name (optional)">
      <div class="stars">
        <label><input type="radio" name="rating" value="1">1</label>
        <label><input type="radio" name="rating" value="2">2</label>
        <label><input type="radio" name="rating" value="3">3</label>
        <label><input type="radio" name="rating" value="4">4</label>
        <label><input type="radio" name="rating" value="5">5</label>
      </div>
      <textarea id="rev-comment" placeholder="Your feedback"></textarea>
      <button type="submit">Submit review</button>
      <p id="review-status"></p>
    </form>
    <section id="reviews"></section>
    <form id="contact-form">
      <input id="contact-name" placeholder="Name">
      <input id="contact-email" type="email" placeholder="Email">
      <textarea id="contact-message" placeholder="Message"></textarea>
      <button type="submit">Send</button>
    </form>"#;
    layout(&state.config.site.name, "Feedback", body)
}

pub async fn bulk_page(State(state): State<AppState>) -> Html<String> {
    let mut body = String::from(
        r#"    <form id="bulk-form">
      <input id="bulk-name" placeholder="Name">
      <input id="bulk-email" type="email" placeholder="Email">
      <textarea id="bulk-purpose" placeholder="Occasion, headcount, date"></textarea>
      <button type="submit">Request quote</button>
    </form>
"#,
    );
    if let Some(number) = state.config.site.owner_whatsapp.as_deref() {
        let number = escape(number);
        body.push_str(&format!(
            r#"    <a class="whatsapp" href="https://wa.me/{number}" target="_blank" rel="noopener">Chat on WhatsApp</a>
"#
        ));
    }
    layout(&state.config.site.name, "Bulk Orders", &body)
}

pub async fn enter_address_page(State(state): State<AppState>) -> Html<String> {
    let body = r#"    <section id="cart-display"></section>
    <form id="address-form">
      <textarea id="address" placeholder="Delivery address"></textarea>
      <button type="submit">Place order</button>
    </form>"#;
    layout(&state.config.site.name, "Delivery Address", body)
}

pub async fn order_confirmed_page(State(state): State<AppState>) -> Html<String> {
    let body = r#"    <h2>Thank you!</h2>
    <p>Your order has been received. We will contact you shortly.</p>
    <a href="/">Back to menu</a>"#;
    layout(&state.config.site.name, "Order Confirmed", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::records::Category;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b>"Fish" & 'Chips'</b>"#),
            "&lt;b&gt;&quot;Fish&quot; &amp; &#39;Chips&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn food_card_escapes_fields() {
        let food = Food {
            id: 8,
            name: "Parotta & Fish Fry".into(),
            category: Category::NonVeg,
            price: 120,
            description: None,
            image: Some("paratta.jpg".into()),
        };
        let card = food_card(&food);
        assert!(card.contains("Parotta &amp; Fish Fry"));
        assert!(card.contains(r#"data-category="Non-Veg""#));
        assert!(card.contains("&#8377;120"));
        assert!(card.contains("/static/images/paratta.jpg"));
        assert!(card.contains(r#"class="add-to-cart" data-id="8""#));
    }
}
