/// Garment categories shown as tabs in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarmentCategory {
    FullBody,
    TopBody,
    Head,
    Pants,
    Foot,
}

impl GarmentCategory {
    /// Label for display in UI
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullBody => "Full body",
            Self::TopBody => "Top Body",
            Self::Head => "Head",
            Self::Pants => "Pants",
            Self::Foot => "Foot",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn all() -> [GarmentCategory; 5] {
        [Self::FullBody, Self::TopBody, Self::Head, Self::Pants, Self::Foot]
    }
}

impl Default for GarmentCategory {
    fn default() -> Self {
        Self::FullBody
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Everyday,
    Modest,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Everyday => "Everyday Basics",
            Self::Modest => "Modern Islamic Attire",
        }
    }
}

/// A preset garment the user can try on without uploading anything
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogItem {
    pub id: &'static str,
    pub name: &'static str,
    /// Listed price, if the item is sold directly
    pub price: Option<u32>,
    pub category: GarmentCategory,
    pub collection: Collection,
    pub image_url: &'static str,
}

static ITEMS: [CatalogItem; 6] = [
    CatalogItem {
        id: "1",
        name: "Basic Sweater",
        price: Some(105),
        category: GarmentCategory::TopBody,
        collection: Collection::Everyday,
        image_url: "https://i.imgur.com/JFHjdNZ.png",
    },
    CatalogItem {
        id: "2",
        name: "Basic Shirt",
        price: Some(105),
        category: GarmentCategory::TopBody,
        collection: Collection::Everyday,
        image_url: "https://i.imgur.com/yXOvdOSs.jpg",
    },
    CatalogItem {
        id: "4",
        name: "Basic Polo",
        price: Some(105),
        category: GarmentCategory::TopBody,
        collection: Collection::Everyday,
        image_url: "https://i.imgur.com/6G3JDn.png",
    },
    CatalogItem {
        id: "kuwaiti-thobe",
        name: "Kuwaiti Modernity Thobe",
        price: None,
        category: GarmentCategory::FullBody,
        collection: Collection::Modest,
        image_url: "https://zuhd.store/cdn/shop/files/6KuwaitiModernity-SingleButtonBrillianceArtboard1_25e5b7f9-fce4-43e8-ae22-a7731079ad2f.jpg",
    },
    CatalogItem {
        id: "collar-thobe",
        name: "Modern Collar Thobe",
        price: None,
        category: GarmentCategory::FullBody,
        collection: Collection::Modest,
        image_url: "https://zuhd.store/cdn/shop/files/Artboard2_f1eceec2-50f2-4fd6-af95-edaa3fca71ea.jpg?v=1695285662&width=1080",
    },
    CatalogItem {
        id: "single-button",
        name: "Single Button Brilliance",
        price: None,
        category: GarmentCategory::FullBody,
        collection: Collection::Modest,
        image_url: "https://zuhd.store/cdn/shop/products/6KuwaitiModernity-SingleButtonBrillianceArtboard1.jpg?v=1695127828&width=1080",
    },
];

impl CatalogItem {
    pub fn all() -> &'static [CatalogItem] {
        &ITEMS
    }

    pub fn find(id: &str) -> Option<&'static CatalogItem> {
        ITEMS.iter().find(|item| item.id == id)
    }

    pub fn in_category(category: GarmentCategory) -> impl Iterator<Item = &'static CatalogItem> {
        ITEMS.iter().filter(move |item| item.category == category)
    }

    pub fn in_collection(collection: Collection) -> impl Iterator<Item = &'static CatalogItem> {
        ITEMS.iter().filter(move |item| item.collection == collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id() {
        assert_eq!(CatalogItem::find("2").unwrap().name, "Basic Shirt");
        assert!(CatalogItem::find("missing").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        for item in CatalogItem::all() {
            assert_eq!(CatalogItem::all().iter().filter(|i| i.id == item.id).count(), 1);
        }
    }

    #[test]
    fn test_category_labels_round_trip() {
        assert_eq!(GarmentCategory::from_label("top body"), Some(GarmentCategory::TopBody));
        assert_eq!(GarmentCategory::from_label("socks"), None);
        assert_eq!(GarmentCategory::default().label(), "Full body");
    }

    #[test]
    fn test_filters() {
        assert_eq!(CatalogItem::in_category(GarmentCategory::TopBody).count(), 3);
        assert_eq!(CatalogItem::in_category(GarmentCategory::Foot).count(), 0);
        assert!(CatalogItem::in_collection(Collection::Modest).all(|i| i.image_url.starts_with("https://zuhd.store")));
    }
}
