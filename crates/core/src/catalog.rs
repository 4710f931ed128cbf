//! The demo catalog.
//!
//! Ten products across five categories, seeded in code the same way the hero
//! content is: no database, no upstream API. Product `category` values are
//! display-cased while the filter row uses lowercase slugs; filtering
//! compares case-insensitively.

use crate::types::{ArKind, Price, Product, ProductId};
use crate::viewer::assets::{
    DAMAGED_HELMET_URL as DAMAGED_HELMET, ROBOT_EXPRESSIVE_URL as ROBOT_EXPRESSIVE,
    SOLDIER_URL as SOLDIER,
};

/// One entry in the category filter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub slug: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

/// The filter row, `all` first.
pub const CATEGORIES: &[Category] = &[
    Category {
        slug: "all",
        name: "All Categories",
        icon: "\u{1f6cd}\u{fe0f}",
    },
    Category {
        slug: "electronics",
        name: "Electronics",
        icon: "\u{1f4f1}",
    },
    Category {
        slug: "furniture",
        name: "Furniture",
        icon: "\u{1f6cb}\u{fe0f}",
    },
    Category {
        slug: "apparel",
        name: "Apparel",
        icon: "\u{1f455}",
    },
    Category {
        slug: "beauty",
        name: "Beauty",
        icon: "\u{1f484}",
    },
    Category {
        slug: "grocery",
        name: "Grocery",
        icon: "\u{1f96c}",
    },
];

/// The seeded catalog plus id lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build the demo catalog.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            products: demo_products(),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::demo()
    }
}

struct ProductSeed {
    id: i32,
    name: &'static str,
    price: i64,
    original_price: Option<i64>,
    rating: f32,
    reviews: u32,
    image: &'static str,
    gallery: &'static [&'static str],
    category: &'static str,
    brand: &'static str,
    description: &'static str,
    features: &'static [&'static str],
    discount_percent: Option<u8>,
    coin_reward: i64,
    has_ar: bool,
    has_vr: bool,
    model_url: Option<&'static str>,
    ar_kind: Option<ArKind>,
}

impl ProductSeed {
    fn build(&self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name.to_owned(),
            price: Price::rupees(self.price),
            original_price: self.original_price.map(Price::rupees),
            rating: self.rating,
            reviews: self.reviews,
            image: self.image.to_owned(),
            images: self.gallery.iter().map(|&url| url.to_owned()).collect(),
            category: self.category.to_owned(),
            brand: self.brand.to_owned(),
            description: self.description.to_owned(),
            features: self.features.iter().map(|&f| f.to_owned()).collect(),
            in_stock: true,
            discount_percent: self.discount_percent,
            coin_reward: self.coin_reward,
            has_ar: self.has_ar,
            has_vr: self.has_vr,
            model_url: self.model_url.map(str::to_owned),
            ar_kind: self.ar_kind,
        }
    }
}

const SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: 1,
        name: "Samsung 65\" 4K Smart TV",
        price: 89_999,
        original_price: Some(99_999),
        rating: 4.5,
        reviews: 234,
        image: "https://images.pexels.com/photos/1444416/pexels-photo-1444416.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/1444416/pexels-photo-1444416.jpeg",
            "https://images.pexels.com/photos/1201996/pexels-photo-1201996.jpeg",
        ],
        category: "Electronics",
        brand: "Samsung",
        description: "Experience stunning 4K picture quality with this Samsung Smart TV featuring HDR10+ and built-in streaming apps.",
        features: &[
            "4K UHD Resolution",
            "HDR10+ Support",
            "Smart TV Platform",
            "Voice Control",
        ],
        discount_percent: Some(10),
        coin_reward: 900,
        has_ar: true,
        has_vr: true,
        model_url: Some(DAMAGED_HELMET),
        ar_kind: Some(ArKind::Electronics),
    },
    ProductSeed {
        id: 2,
        name: "iPhone 15 Pro Max",
        price: 134_900,
        original_price: None,
        rating: 4.8,
        reviews: 156,
        image: "https://images.pexels.com/photos/788946/pexels-photo-788946.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/788946/pexels-photo-788946.jpeg",
            "https://images.pexels.com/photos/1275229/pexels-photo-1275229.jpeg",
        ],
        category: "Electronics",
        brand: "Apple",
        description: "The most powerful iPhone ever with titanium design, A17 Pro chip, and pro camera system.",
        features: &["A17 Pro Chip", "Titanium Design", "Pro Camera System", "USB-C"],
        discount_percent: None,
        coin_reward: 1_349,
        has_ar: true,
        has_vr: false,
        model_url: Some(ROBOT_EXPRESSIVE),
        ar_kind: Some(ArKind::Electronics),
    },
    ProductSeed {
        id: 3,
        name: "Modern L-Shaped Sofa",
        price: 75_000,
        original_price: Some(85_000),
        rating: 4.3,
        reviews: 89,
        image: "https://images.pexels.com/photos/1148955/pexels-photo-1148955.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/1148955/pexels-photo-1148955.jpeg",
            "https://images.pexels.com/photos/1866149/pexels-photo-1866149.jpeg",
        ],
        category: "Furniture",
        brand: "HomeTrend",
        description: "Comfortable L-shaped sofa perfect for modern living rooms. Made with high-quality fabric and sturdy frame.",
        features: &[
            "L-Shaped Design",
            "Premium Fabric",
            "Sturdy Frame",
            "Easy Assembly",
        ],
        discount_percent: Some(12),
        coin_reward: 750,
        has_ar: true,
        has_vr: true,
        model_url: Some(SOLDIER),
        ar_kind: Some(ArKind::Furniture),
    },
    ProductSeed {
        id: 4,
        name: "Dining Table Set (6 Seater)",
        price: 45_000,
        original_price: None,
        rating: 4.6,
        reviews: 67,
        image: "https://images.pexels.com/photos/1395964/pexels-photo-1395964.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/1395964/pexels-photo-1395964.jpeg",
            "https://images.pexels.com/photos/1395966/pexels-photo-1395966.jpeg",
        ],
        category: "Furniture",
        brand: "WoodCraft",
        description: "Elegant 6-seater dining table set made from solid wood with comfortable upholstered chairs.",
        features: &[
            "Solid Wood Construction",
            "Upholstered Chairs",
            "6 Seater Capacity",
            "Scratch Resistant",
        ],
        discount_percent: None,
        coin_reward: 450,
        has_ar: true,
        has_vr: false,
        model_url: Some(DAMAGED_HELMET),
        ar_kind: Some(ArKind::Furniture),
    },
    ProductSeed {
        id: 5,
        name: "Designer Kurta Set",
        price: 2_999,
        original_price: Some(3_999),
        rating: 4.4,
        reviews: 123,
        image: "https://images.pexels.com/photos/432059/pexels-photo-432059.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/432059/pexels-photo-432059.jpeg",
            "https://images.pexels.com/photos/1536619/pexels-photo-1536619.jpeg",
        ],
        category: "Apparel",
        brand: "EthnicWear",
        description: "Traditional designer kurta set with intricate embroidery work. Perfect for festivals and special occasions.",
        features: &[
            "Pure Cotton",
            "Hand Embroidery",
            "Comfortable Fit",
            "Machine Washable",
        ],
        discount_percent: Some(25),
        coin_reward: 30,
        has_ar: true,
        has_vr: true,
        model_url: Some(SOLDIER),
        ar_kind: Some(ArKind::Apparel),
    },
    ProductSeed {
        id: 6,
        name: "Casual Denim Jacket",
        price: 1_999,
        original_price: None,
        rating: 4.2,
        reviews: 78,
        image: "https://images.pexels.com/photos/1656684/pexels-photo-1656684.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/1656684/pexels-photo-1656684.jpeg",
            "https://images.pexels.com/photos/1656685/pexels-photo-1656685.jpeg",
        ],
        category: "Apparel",
        brand: "DenimStyle",
        description: "Classic denim jacket with a modern fit. Perfect for casual outings and layering.",
        features: &[
            "100% Cotton Denim",
            "Classic Fit",
            "Multiple Pockets",
            "Durable Construction",
        ],
        discount_percent: None,
        coin_reward: 20,
        has_ar: true,
        has_vr: false,
        model_url: Some(ROBOT_EXPRESSIVE),
        ar_kind: Some(ArKind::Apparel),
    },
    ProductSeed {
        id: 7,
        name: "Luxury Skincare Set",
        price: 4_999,
        original_price: Some(6_999),
        rating: 4.7,
        reviews: 234,
        image: "https://images.pexels.com/photos/3018845/pexels-photo-3018845.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/3018845/pexels-photo-3018845.jpeg",
            "https://images.pexels.com/photos/3018848/pexels-photo-3018848.jpeg",
        ],
        category: "Beauty",
        brand: "GlowUp",
        description: "Complete luxury skincare routine with cleanser, serum, moisturizer, and sunscreen.",
        features: &[
            "All Skin Types",
            "Paraben Free",
            "Dermatologically Tested",
            "Anti-Aging Formula",
        ],
        discount_percent: Some(29),
        coin_reward: 50,
        has_ar: false,
        has_vr: false,
        model_url: None,
        ar_kind: None,
    },
    ProductSeed {
        id: 8,
        name: "Organic Grocery Combo",
        price: 1_299,
        original_price: None,
        rating: 4.5,
        reviews: 156,
        image: "https://images.pexels.com/photos/1132047/pexels-photo-1132047.jpeg",
        gallery: &[
            "https://images.pexels.com/photos/1132047/pexels-photo-1132047.jpeg",
            "https://images.pexels.com/photos/1300973/pexels-photo-1300973.jpeg",
        ],
        category: "Grocery",
        brand: "OrganicFresh",
        description: "Fresh organic grocery combo including rice, pulses, oil, and spices for a healthy lifestyle.",
        features: &["100% Organic", "Pesticide Free", "Fresh Packaging", "Nutritious"],
        discount_percent: None,
        coin_reward: 13,
        has_ar: false,
        has_vr: false,
        model_url: None,
        ar_kind: None,
    },
    ProductSeed {
        id: 9,
        name: "Gaming Chair Pro",
        price: 25_000,
        original_price: Some(30_000),
        rating: 4.6,
        reviews: 89,
        image: "https://images.pexels.com/photos/4050315/pexels-photo-4050315.jpeg",
        gallery: &["https://images.pexels.com/photos/4050315/pexels-photo-4050315.jpeg"],
        category: "Furniture",
        brand: "GameZone",
        description: "Professional gaming chair with ergonomic design and RGB lighting.",
        features: &[
            "Ergonomic Design",
            "RGB Lighting",
            "Adjustable Height",
            "Premium Materials",
        ],
        discount_percent: Some(17),
        coin_reward: 250,
        has_ar: true,
        has_vr: true,
        model_url: Some(DAMAGED_HELMET),
        ar_kind: Some(ArKind::Furniture),
    },
    ProductSeed {
        id: 10,
        name: "Wireless Headphones",
        price: 15_999,
        original_price: Some(19_999),
        rating: 4.4,
        reviews: 156,
        image: "https://images.pexels.com/photos/3394650/pexels-photo-3394650.jpeg",
        gallery: &["https://images.pexels.com/photos/3394650/pexels-photo-3394650.jpeg"],
        category: "Electronics",
        brand: "AudioTech",
        description: "Premium wireless headphones with noise cancellation and 30-hour battery life.",
        features: &[
            "Noise Cancellation",
            "30-Hour Battery",
            "Wireless Charging",
            "Premium Sound",
        ],
        discount_percent: Some(20),
        coin_reward: 160,
        has_ar: true,
        has_vr: false,
        model_url: Some(ROBOT_EXPRESSIVE),
        ar_kind: Some(ArKind::Electronics),
    },
];

fn demo_products() -> Vec<Product> {
    SEEDS.iter().map(ProductSeed::build).collect()
}
