use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use quotedesk_core::domain::product::open_ended;
use quotedesk_core::{
    ChallanId, ChallanLine, Customer, CustomerId, CustomerRef, DeliveryChallan, DiscountPercent,
    PriceBand, Product, ProductId, Quotation, QuotationId, QuotationLine, QuotationStatus,
    QuotationTerms, SalesPerson, SalesPersonId,
};

use crate::repositories::{
    CustomerRepository, Documents, ProductRepository, QuotationRepository, RepositoryError,
    SalesPersonRepository,
};
use crate::store::{Collection, RecordStore};

const DEMO_QUOTATION_IDS: [u64; 3] = [1001, 1002, 1003];
const DEMO_CHALLAN_ID: u64 = 501;

/// Deterministic demo data for a fresh store: a small cable catalog with
/// dated price bands, two customers, two sales people, three quotations in
/// different states and one delivery challan. Loading twice is a no-op.
pub struct DemoDataset;

impl DemoDataset {
    pub async fn load(store: Arc<dyn RecordStore>) -> Result<SeedResult, RepositoryError> {
        let products = ProductRepository::new(store.clone());
        let customers = CustomerRepository::new(store.clone());
        let sales_people = SalesPersonRepository::new(store.clone());
        let quotations = QuotationRepository::new(store.clone());
        let challans = Documents::new(store, Collection::DeliveryChallans);

        let mut result = SeedResult::default();
        for product in demo_products() {
            result.changes += products.save(product).await?.len();
            result.products += 1;
        }
        for customer in demo_customers() {
            result.changes += customers.save(&customer).await?.len();
            result.customers += 1;
        }
        for person in demo_sales_people() {
            result.changes += sales_people.save(&person).await?.len();
            result.sales_persons += 1;
        }
        for quotation in demo_quotations() {
            result.changes += quotations.save(quotation).await?.len();
            result.quotations += 1;
        }
        result.changes += challans.upsert(&demo_challan()).await?.len();
        result.challans += 1;

        Ok(result)
    }

    /// Checks that every demo record is present with its expected shape.
    pub async fn verify(
        store: Arc<dyn RecordStore>,
    ) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let catalog = ProductRepository::new(store.clone()).catalog().await?;
        for product in demo_products() {
            checks.push(("product", catalog.find(&product.id).is_some()));
        }
        checks.push((
            "product-bands-restamped",
            catalog
                .find(&ProductId("FRLS-1.5".to_owned()))
                .and_then(|product| product.bands.last())
                .is_some_and(|band| band.valid_to == open_ended()),
        ));

        let customers = CustomerRepository::new(store.clone()).list().await?;
        checks.push(("customers", customers.len() >= demo_customers().len()));
        let people = SalesPersonRepository::new(store.clone()).list().await?;
        checks.push(("sales-persons", people.len() >= demo_sales_people().len()));

        let quotations = QuotationRepository::new(store.clone());
        for id in DEMO_QUOTATION_IDS {
            checks.push(("quotation", quotations.find_by_id(QuotationId(id)).await?.is_some()));
        }
        let won = quotations.find_by_id(QuotationId(1002)).await?;
        checks.push((
            "quotation-status",
            won.is_some_and(|quotation| quotation.status == QuotationStatus::PoReceived),
        ));

        let challans: Vec<DeliveryChallan> =
            Documents::new(store, Collection::DeliveryChallans).load().await?;
        checks.push((
            "challan",
            challans.iter().any(|challan| challan.id == ChallanId(DEMO_CHALLAN_ID)),
        ));

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub products: usize,
    pub customers: usize,
    pub sales_persons: usize,
    pub quotations: usize,
    pub challans: usize,
    /// Change events emitted while loading; zero when everything was present.
    pub changes: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn rupees(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId("FRLS-1.5".to_owned()),
            item_code: "FRLS-1.5".to_owned(),
            description: "FRLS 1.5 sqmm single core copper cable".to_owned(),
            part_no: "PN-1500".to_owned(),
            material_code: "MC-01500".to_owned(),
            weight_grams_per_unit: rupees(22),
            bands: vec![
                PriceBand::list(rupees(18), day(2025, 1, 1), open_ended()),
                PriceBand::list(rupees(20), day(2025, 4, 1), open_ended()),
            ],
        },
        Product {
            id: ProductId("FRLS-2.5".to_owned()),
            item_code: "FRLS-2.5".to_owned(),
            description: "FRLS 2.5 sqmm single core copper cable".to_owned(),
            part_no: "PN-2500".to_owned(),
            material_code: "MC-02500".to_owned(),
            weight_grams_per_unit: rupees(34),
            bands: vec![PriceBand::special(rupees(27), day(2025, 1, 1), open_ended())],
        },
        Product {
            id: ProductId("ARM-4C-16".to_owned()),
            item_code: "ARM-4C-16".to_owned(),
            description: "Armoured 4 core 16 sqmm aluminium cable".to_owned(),
            part_no: "PN-4C16".to_owned(),
            material_code: "MC-4C016".to_owned(),
            weight_grams_per_unit: Decimal::new(8505, 1),
            bands: vec![
                PriceBand::list(rupees(310), day(2024, 10, 1), open_ended()),
                PriceBand::list(rupees(335), day(2025, 2, 15), open_ended()),
            ],
        },
    ]
}

fn demo_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: CustomerId(1),
            name: "Apex Electricals".to_owned(),
            city: "Pune".to_owned(),
            contact_person: "R. Kulkarni".to_owned(),
            contact_number: "020-5550101".to_owned(),
        },
        Customer {
            id: CustomerId(2),
            name: "Bharat Switchgear".to_owned(),
            city: "Nashik".to_owned(),
            contact_person: "S. Deshmukh".to_owned(),
            contact_number: "0253-5550202".to_owned(),
        },
    ]
}

fn demo_sales_people() -> Vec<SalesPerson> {
    vec![
        SalesPerson {
            id: SalesPersonId(1),
            name: "Meera Nair".to_owned(),
            phone: "98450-00001".to_owned(),
        },
        SalesPerson {
            id: SalesPersonId(2),
            name: "Arjun Patil".to_owned(),
            phone: "98450-00002".to_owned(),
        },
    ]
}

fn customer_ref(index: usize) -> CustomerRef {
    let customers = demo_customers();
    customers.get(index).map(CustomerRef::from).unwrap_or_else(|| CustomerRef {
        id: CustomerId(0),
        name: String::new(),
    })
}

fn demo_quotations() -> Vec<Quotation> {
    let products = demo_products();
    let terms = QuotationTerms {
        price_basis: "Ex-works Pune".to_owned(),
        delivery: "Two weeks from PO".to_owned(),
        payment: "30 days credit".to_owned(),
        validity: "15 days".to_owned(),
        freight: "To pay".to_owned(),
    };

    let mut open = Quotation::new(QuotationId(1001), day(2025, 3, 10), customer_ref(0));
    open.sales_person = Some(SalesPersonId(1));
    open.terms = terms.clone();
    open.lines = products
        .iter()
        .take(2)
        .map(|product| {
            let mut line = QuotationLine {
                quantity_ordered: 500,
                quantity_requested: 450,
                discount_percent: DiscountPercent::new(rupees(5)),
                ..QuotationLine::default()
            };
            line.apply_product(product, open.document_date);
            line
        })
        .collect();

    let mut won = Quotation::new(QuotationId(1002), day(2025, 4, 2), customer_ref(1));
    won.sales_person = Some(SalesPersonId(2));
    won.terms = terms.clone();
    won.status = QuotationStatus::PoReceived;
    won.lines = products
        .iter()
        .skip(2)
        .map(|product| {
            let mut line = QuotationLine {
                quantity_ordered: 100,
                quantity_requested: 100,
                freight_eligible: true,
                freight_lead_time: "3 days".to_owned(),
                ..QuotationLine::default()
            };
            line.apply_product(product, won.document_date);
            line
        })
        .collect();

    let mut lost = Quotation::new(QuotationId(1003), day(2025, 2, 20), customer_ref(0));
    lost.sales_person = Some(SalesPersonId(1));
    lost.terms = terms;
    lost.status = QuotationStatus::Lost;
    lost.comments = "Lost on price to a local trader".to_owned();

    vec![open, won, lost]
}

fn demo_challan() -> DeliveryChallan {
    DeliveryChallan {
        id: ChallanId(DEMO_CHALLAN_ID),
        challan_date: day(2025, 4, 10),
        customer: customer_ref(1),
        quotation_id: Some(QuotationId(1002)),
        lines: vec![ChallanLine {
            product_id: Some(ProductId("ARM-4C-16".to_owned())),
            description: "Armoured 4 core 16 sqmm aluminium cable".to_owned(),
            quantity: 100,
            unit_price: rupees(335),
            discount_percent: DiscountPercent::ZERO,
        }],
    }
}
