use super::records::Category;

/// One row of the starter catalog
pub struct SeedFood {
    pub name: &'static str,
    pub category: Category,
    pub price: u32,
    pub description: &'static str,
    pub image: &'static str,
}

const fn food(
    name: &'static str,
    category: Category,
    price: u32,
    description: &'static str,
    image: &'static str,
) -> SeedFood {
    SeedFood {
        name,
        category,
        price,
        description,
        image,
    }
}

/// Inserted on startup when the `foods` table is empty
pub const CATALOG: &[SeedFood] = &[
    food("Biryani", Category::NonVeg, 200, "Delicious biryani served with aromatic spices.", "biryani.jpg"),
    food("Mini Meals", Category::Veg, 50, "Tasty paneer butter masala with soft paneer cubes.", "mini_meals.jpg"),
    food("Chicken Curry", Category::NonVeg, 130, "Homestyle chicken curry with rich gravy.", "chicken_curry.jpg"),
    food("Paneer Pulao", Category::Veg, 110, "Wok-fried rice with paneer and fresh veggies.", "panner_pulao.jpg"),
    food("Veg Meals", Category::Veg, 80, "Crispy masala dosa with spiced potato filling.", "veg_meals.jpg"),
    food("Mutton Curry", Category::NonVeg, 170, "Fluffy omelette with mutton-flavored seasoning.", "mutton_curry.jpg"),
    food("Veg Biryani", Category::Veg, 60, "Fragrant rice with peas and assorted spices.", "veg_briyani.jpg"),
    food("Parotta & Fish Fry", Category::NonVeg, 120, "Crispy spiced fish served with parotta.", "paratta.jpg"),
    food("Veg Pulao", Category::Veg, 100, "Fragrant rice with peas and assorted spices.", "veg_pulao.jpg"),
];
