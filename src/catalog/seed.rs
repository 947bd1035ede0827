use crate::domain::Product;

/// Products the storefront opens with.
pub fn products() -> Vec<Product> {
    vec![
        Product::new(1, "Poundo Yam Flour 1.8kg", "grains", 7_500, 6_200)
            .with_description(["Smooth and stretchy", "Ready in minutes", "No lumps"])
            .with_image("https://images.bokku.example/poundo-yam.jpg"),
        Product::new(2, "Mama Gold Rice 5kg", "grains", 14_000, 12_800)
            .with_description(["Premium parboiled rice", "Stone free"])
            .with_image("https://images.bokku.example/mama-gold.jpg"),
        Product::new(3, "Golden Penny Spaghetti 500g", "pasta", 1_200, 950)
            .with_description(["Made from durum wheat", "Cooks in 10 minutes"])
            .with_image("https://images.bokku.example/golden-penny.jpg"),
        Product::new(4, "Indomie Chicken Noodles (40 pack)", "pasta", 9_800, 8_900)
            .with_description(["Carton of 40 packs", "Chicken flavour"])
            .with_image("https://images.bokku.example/indomie.jpg"),
        Product::new(5, "Peak Full Cream Milk Tin 400g", "dairy", 4_200, 3_850)
            .with_description(["Rich and creamy", "Fortified with vitamins A and D"])
            .with_image("https://images.bokku.example/peak-milk.jpg"),
        Product::new(6, "Milo Refill 500g", "beverages", 3_600, 3_300)
            .with_description(["Chocolate malt drink", "Energy for the day"])
            .with_image("https://images.bokku.example/milo.jpg"),
        Product::new(7, "Kings Vegetable Oil 3L", "cooking", 11_500, 10_400)
            .with_description(["Cholesterol free", "Ideal for frying and baking"])
            .with_image("https://images.bokku.example/kings-oil.jpg"),
        Product::new(8, "Dangote Sugar 1kg", "cooking", 2_400, 2_150)
            .with_description(["Refined granulated sugar"])
            .with_image("https://images.bokku.example/dangote-sugar.jpg"),
    ]
}
