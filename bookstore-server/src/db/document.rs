//! Document trait and the collection registry

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    BoardGame, Book, BookSeries, Cart, CartItem, Company, ContactInfo, Contributor,
    ContributorRole, Country, Delivery, DeliveryType, Order, PaymentType, Product, ProductType,
    Publisher, Review, Section, User,
};

/// A JSON document stored in its own collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table name
    const COLLECTION: &'static str;
    /// Name used in error messages
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn deleted_at(&self) -> Option<i64>;
    fn set_deleted_at(&mut self, at: i64);
    fn touch(&mut self, at: i64);

    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }
}

macro_rules! document {
    ($ty:ty, $collection:literal, $label:literal) => {
        impl Document for $ty {
            const COLLECTION: &'static str = $collection;
            const LABEL: &'static str = $label;

            fn id(&self) -> &str {
                &self.id
            }

            fn deleted_at(&self) -> Option<i64> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, at: i64) {
                self.deleted_at = Some(at);
                self.updated_at = at;
            }

            fn touch(&mut self, at: i64) {
                self.updated_at = at;
            }
        }
    };
}

document!(Publisher, "publisher", "Publisher");
document!(BookSeries, "book_series", "Book series");
document!(Section, "section", "Section");
document!(ProductType, "product_type", "Product type");
document!(Product, "product", "Product");
document!(Book, "book", "Book");
document!(BoardGame, "board_game", "Board game");
document!(User, "user", "User");
document!(Cart, "cart", "Cart");
document!(CartItem, "cart_item", "Cart item");
document!(Order, "order", "Order");
document!(ContactInfo, "contact_info", "Contact info");
document!(Company, "company", "Company");
document!(Delivery, "delivery", "Delivery");
document!(Country, "country", "Country");
document!(PaymentType, "payment_type", "Payment type");
document!(DeliveryType, "delivery_type", "Delivery type");
document!(Review, "review", "Review");

impl<R: ContributorRole> Document for Contributor<R> {
    const COLLECTION: &'static str = R::COLLECTION;
    const LABEL: &'static str = R::LABEL;

    fn id(&self) -> &str {
        &self.id
    }

    fn deleted_at(&self) -> Option<i64> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: i64) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    fn touch(&mut self, at: i64) {
        self.updated_at = at;
    }
}

/// Every collection created when the store opens
pub const COLLECTIONS: &[&str] = &[
    "author",
    "compiler",
    "translator",
    "illustrator",
    "editor",
    "publisher",
    "book_series",
    "section",
    "product_type",
    "product",
    "book",
    "board_game",
    "user",
    "cart",
    "cart_item",
    "order",
    "contact_info",
    "company",
    "delivery",
    "country",
    "payment_type",
    "delivery_type",
    "review",
];

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Author, AuthorRole, Editor, EditorRole};

    #[test]
    fn test_every_collection_is_registered() {
        for name in [
            <Author as Document>::COLLECTION,
            <Editor as Document>::COLLECTION,
            Publisher::COLLECTION,
            BookSeries::COLLECTION,
            Section::COLLECTION,
            ProductType::COLLECTION,
            Product::COLLECTION,
            Book::COLLECTION,
            BoardGame::COLLECTION,
            User::COLLECTION,
            Cart::COLLECTION,
            CartItem::COLLECTION,
            Order::COLLECTION,
            ContactInfo::COLLECTION,
            Company::COLLECTION,
            Delivery::COLLECTION,
            Country::COLLECTION,
            PaymentType::COLLECTION,
            DeliveryType::COLLECTION,
            Review::COLLECTION,
        ] {
            assert!(COLLECTIONS.contains(&name), "{name} missing");
        }
        assert_eq!(<Author as Document>::COLLECTION, AuthorRole::COLLECTION);
        assert_eq!(<Editor as Document>::LABEL, EditorRole::LABEL);
    }
}
