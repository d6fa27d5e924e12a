/// Preset scene concepts offered in the design step. Selecting one copies its
/// description into the scene text, where it stays editable.
pub struct Concept {
    pub title: &'static str,
    pub description: &'static str,
}

pub const CREATIVE_CONCEPTS: &[Concept] = &[
    Concept {
        title: "Deconstructed Delight",
        description: "A visually stunning flat-lay of your food product, deconstructed into its core ingredients (like floating chocolate chips, a swirl of caramel, fresh berries) arranged beautifully on a rustic wooden or marble surface. The lighting is soft and natural.",
    },
    Concept {
        title: "Zero-Gravity Treat",
        description: "The dessert and its various toppings (sprinkles, fruit, sauce) float weightlessly in a minimalist, pastel-colored room. A slow-motion camera pan captures the delicious details from every angle, creating a dreamlike, magical effect.",
    },
    Concept {
        title: "Giant Food in the City",
        description: "A colossal version of your food or beverage product placed in a bustling, iconic city street. Imagine a giant cookie being dunked into a river, or a skyscraper-sized ice cream cone with melting drips down the side.",
    },
    Concept {
        title: "Nature's Serving Plate",
        description: "Your dessert is presented in a breathtaking natural setting. Imagine an ice cream scoop nestled in a blooming lotus flower on a serene pond, or a slice of cake resting on a moss-covered rock in an enchanted forest.",
    },
    Concept {
        title: "Stop-Motion Creation",
        description: "A playful and vibrant scene showing your dessert being magically assembled piece-by-piece in a stop-motion style. Ingredients dance and jump into place on a colorful, patterned background, ending with the perfect final product.",
    },
    Concept {
        title: "Flavor Explosion",
        description: "An extreme close-up, slow-motion shot of the dessert being cracked open or bitten into, causing a beautiful explosion of fillings, powders, or liquid centers. The background is dark and moody to make the colors of the ingredients pop.",
    },
    Concept {
        title: "Dessert Drip Symphony",
        description: "A mesmerizing shot focusing on rich, glossy sauces (chocolate, caramel, berry coulis) being drizzled over the dessert in slow motion. The camera follows the drip as it elegantly coats the surface, emphasizing texture and indulgence.",
    },
];
