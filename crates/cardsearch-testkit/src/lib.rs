// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cardsearch_app::{Record, RecordKind};

const ISSUERS: [&str; 8] = [
    "Visa",
    "Mastercard",
    "Diners Club",
    "American Express",
    "Discover",
    "UnionPay",
    "JCB",
    "Cabal",
];

const TIERS: [&str; 8] = [
    "Clásica",
    "Gold",
    "Platinum",
    "Black",
    "Signature",
    "Infinite",
    "Joven",
    "Empresarial",
];

const OTHER_PRODUCTS: [&str; 6] = [
    "Cuenta de Ahorros",
    "Cuenta Corriente",
    "Crédito Hipotecario",
    "Crédito Automotriz",
    "Póliza de Inversión",
    "Microcrédito",
];

const OTHER_KIND_CODES: [&str; 4] = ["A", "C", "H", "P"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Generates a reproducible card catalog for demos and tests.
#[derive(Debug, Clone)]
pub struct CardFaker {
    rng: DeterministicRng,
    next_code: i64,
}

impl CardFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_code: 1001,
        }
    }

    pub fn record(&mut self) -> Record {
        let code = self.next_code;
        self.next_code += 1 + self.rng.int_n(17) as i64;

        // Roughly three out of four products are credit cards.
        if self.rng.int_n(4) == 0 {
            let name = self.pick(&OTHER_PRODUCTS);
            let kind = RecordKind::parse(self.pick(&OTHER_KIND_CODES));
            return Record::new(code, name, self.limit(), kind);
        }

        let name = format!("{} {}", self.pick(&ISSUERS), self.pick(&TIERS));
        Record::new(code, &name, self.limit(), RecordKind::CreditCard)
    }

    pub fn catalog(&mut self, count: usize) -> Vec<Record> {
        (0..count).map(|_| self.record()).collect()
    }

    fn limit(&mut self) -> f64 {
        let dollars = 250 + self.rng.int_n(40) * 250;
        let cents = [0, 50, 75][self.rng.int_n(3)];
        dollars as f64 + f64::from(cents) / 100.0
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

/// Small hand-written catalog with known codes and names.
pub fn sample_catalog() -> Vec<Record> {
    vec![
        Record::new(1234, "Visa Gold", 500.5, RecordKind::CreditCard),
        Record::new(2045, "Mastercard Black", 15_000.0, RecordKind::CreditCard),
        Record::new(3100, "Diners Club Clásica", 2_500.75, RecordKind::CreditCard),
        Record::new(4561, "Cuenta de Ahorros", 0.0, RecordKind::Other("A".to_owned())),
        Record::new(5612, "Visa Infinite", 30_000.0, RecordKind::CreditCard),
    ]
}

/// Serializes records with the upstream field names, as the retrieve
/// endpoint would send them.
pub fn catalog_json(records: &[Record]) -> Result<String> {
    serde_json::to_string(records).context("encode catalog")
}
