use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn find_by_item_code(&self, item_code: &str) -> Option<&Product> {
        let wanted = item_code.trim();
        self.products.iter().find(|product| product.item_code.eq_ignore_ascii_case(wanted))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
