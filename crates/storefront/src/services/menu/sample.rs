//! Bundled sample catalog, served when neither the remote store nor the cache
//! can provide a menu.

use corner_cafe_core::{CategoryId, DishId, MenuCategory, MenuData, MenuItem, Price};

const IMG_ESPRESSO: &str = "https://images.pexels.com/photos/312418/pexels-photo-312418.jpeg";
const IMG_AMERICANO: &str = "https://images.pexels.com/photos/1458671/pexels-photo-1458671.jpeg";
const IMG_CAPPUCCINO: &str = "https://images.pexels.com/photos/302899/pexels-photo-302899.jpeg";
const IMG_LATTE: &str = "https://images.pexels.com/photos/324028/pexels-photo-324028.jpeg";
const IMG_TEA: &str = "https://images.pexels.com/photos/1638280/pexels-photo-1638280.jpeg";
const IMG_CHAMOMILE: &str = "https://images.pexels.com/photos/230477/pexels-photo-230477.jpeg";
const IMG_LEMONADE: &str = "https://images.pexels.com/photos/96974/pexels-photo-96974.jpeg";
const IMG_SMOOTHIE: &str = "https://images.pexels.com/photos/775032/pexels-photo-775032.jpeg";
const IMG_GREEN_SMOOTHIE: &str = "https://images.pexels.com/photos/1092730/pexels-photo-1092730.jpeg";
const IMG_PASTRY: &str = "https://images.pexels.com/photos/2135/food-france-morning-breakfast.jpg";
const IMG_MUFFIN: &str = "https://images.pexels.com/photos/2067396/pexels-photo-2067396.jpeg";
const IMG_SANDWICH: &str = "https://images.pexels.com/photos/1633525/pexels-photo-1633525.jpeg";
const IMG_SALAD: &str = "https://images.pexels.com/photos/1059905/pexels-photo-1059905.jpeg";

/// (id, name, description, price, image)
type Dish = (&'static str, &'static str, &'static str, u32, &'static str);

const CATALOG: &[(&str, &str, &[Dish])] = &[
    (
        "1",
        "Coffee",
        &[
            ("1", "Espresso", "Rich and bold espresso shot", 120, IMG_ESPRESSO),
            ("2", "Americano", "Smooth espresso with hot water", 140, IMG_AMERICANO),
            ("3", "Cappuccino", "Espresso with steamed milk and foam", 160, IMG_CAPPUCCINO),
            ("4", "Latte", "Smooth espresso with steamed milk", 170, IMG_LATTE),
        ],
    ),
    (
        "2",
        "Tea & Lemonade",
        &[
            ("5", "Green Tea", "Fresh green tea leaves", 100, IMG_TEA),
            ("6", "Chamomile Tea", "Relaxing herbal tea", 110, IMG_CHAMOMILE),
            ("7", "Fresh Lemonade", "Freshly squeezed lemon juice", 130, IMG_LEMONADE),
            ("8", "Iced Tea", "Refreshing iced black tea", 120, IMG_TEA),
        ],
    ),
    (
        "3",
        "Smoothies",
        &[
            ("9", "Mango Smoothie", "Fresh mango blended with yogurt", 180, IMG_SMOOTHIE),
            ("10", "Berry Blast", "Mixed berries with banana", 190, IMG_SMOOTHIE),
            ("11", "Green Smoothie", "Spinach, apple, and banana", 200, IMG_GREEN_SMOOTHIE),
        ],
    ),
    (
        "4",
        "Pastries",
        &[
            ("12", "Croissant", "Buttery, flaky pastry", 150, IMG_PASTRY),
            ("13", "Chocolate Muffin", "Rich chocolate chip muffin", 160, IMG_MUFFIN),
            ("14", "Danish Pastry", "Sweet pastry with fruit filling", 170, IMG_PASTRY),
        ],
    ),
    (
        "5",
        "Sandwiches",
        &[
            ("15", "Club Sandwich", "Triple-decker with turkey and bacon", 320, IMG_SANDWICH),
            ("16", "Grilled Cheese", "Melted cheese on toasted bread", 220, IMG_SANDWICH),
            ("17", "BLT", "Bacon, lettuce, and tomato", 280, IMG_SANDWICH),
        ],
    ),
    (
        "6",
        "Salads",
        &[
            ("18", "Caesar Salad", "Crisp romaine with parmesan", 250, IMG_SALAD),
            ("19", "Garden Salad", "Fresh mixed greens and vegetables", 220, IMG_SALAD),
        ],
    ),
];

/// The bundled menu: six categories, nineteen dishes.
#[must_use]
pub fn sample_menu() -> MenuData {
    let categories = CATALOG
        .iter()
        .map(|&(id, name, dishes)| MenuCategory {
            id: CategoryId::new(id),
            name: name.to_string(),
            slug: None,
            description: None,
            items: dishes
                .iter()
                .map(|&(id, name, description, price, image)| MenuItem {
                    id: DishId::new(id),
                    name: name.to_string(),
                    description: description.to_string(),
                    price: Price::from_units(price),
                    image: image.to_string(),
                    is_available: None,
                    is_featured: None,
                    prep_time_minutes: None,
                })
                .collect(),
        })
        .collect();

    MenuData { categories }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_menu_shape() {
        let menu = sample_menu();
        let names: Vec<_> = menu.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Coffee",
                "Tea & Lemonade",
                "Smoothies",
                "Pastries",
                "Sandwiches",
                "Salads"
            ]
        );
        assert_eq!(menu.items().count(), 19);
    }

    #[test]
    fn test_sample_menu_prices() {
        let menu = sample_menu();
        let price = |id: &str| menu.find_item(&DishId::new(id)).map(|i| i.price);
        assert_eq!(price("1"), Some(Price::from_units(120)));
        assert_eq!(price("15"), Some(Price::from_units(320)));
        assert_eq!(price("19"), Some(Price::from_units(220)));
    }

    #[test]
    fn test_sample_dish_ids_are_unique() {
        let menu = sample_menu();
        let mut ids: Vec<_> = menu.items().map(|i| i.id.as_str().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 19);
    }
}
