use crate::booking::TicketSelection;
use crate::catalog::TicketCatalog;

/// Totals a ticket selection against the catalog, in pence.
///
/// Unknown category ids contribute nothing so the calculator keeps
/// working across catalog changes. Accumulates in i64, which cannot
/// overflow for any combination of u32 quantities and catalog prices.
pub fn quote_total(catalog: &TicketCatalog, selection: &TicketSelection) -> i64 {
    let mut total = 0i64;

    for (id, quantity) in &selection.quantities {
        if let Some(price) = catalog.flat_price(id) {
            total += i64::from(price) * i64::from(*quantity);
        }
    }

    if let Some(group) = &selection.group {
        total += i64::from(catalog.student_rate_pence) * i64::from(group.students)
            + i64::from(catalog.teacher_rate_pence) * i64::from(group.teachers);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::GroupParty;
    use std::collections::BTreeMap;

    fn selection(pairs: &[(&str, u32)]) -> TicketSelection {
        TicketSelection {
            quantities: pairs
                .iter()
                .map(|(id, qty)| (id.to_string(), *qty))
                .collect(),
            group: None,
        }
    }

    #[test]
    fn flat_rate_totals() {
        let catalog = TicketCatalog::standard();

        // 1x family (27.99) + 2x adult (9.99) = 47.97
        let total = quote_total(&catalog, &selection(&[("family", 1), ("adult", 2)]));
        assert_eq!(total, 4797);
    }

    #[test]
    fn group_rate_totals() {
        let catalog = TicketCatalog::standard();
        let selection = TicketSelection {
            quantities: BTreeMap::new(),
            group: Some(GroupParty {
                students: 3,
                teachers: 1,
            }),
        };

        // 3 x 3.99 + 1 x 5.99 = 17.96
        assert_eq!(quote_total(&catalog, &selection), 1796);
    }

    #[test]
    fn unknown_categories_contribute_nothing() {
        let catalog = TicketCatalog::standard();
        let total = quote_total(&catalog, &selection(&[("adult", 1), ("llama_ride", 4)]));
        assert_eq!(total, 999);
    }

    #[test]
    fn empty_selection_is_free() {
        let catalog = TicketCatalog::standard();
        assert_eq!(quote_total(&catalog, &selection(&[])), 0);
    }

    #[test]
    fn extreme_quantities_total_without_wrapping() {
        let catalog = TicketCatalog::standard();
        let total = quote_total(&catalog, &selection(&[("adult", 3_000_000)]));
        assert_eq!(total, 999 * 3_000_000i64);

        let total = quote_total(&catalog, &selection(&[("family", u32::MAX)]));
        assert_eq!(total, 2799 * i64::from(u32::MAX));
    }

    #[test]
    fn flat_and_group_combine() {
        let catalog = TicketCatalog::standard();
        let selection = TicketSelection {
            quantities: [("adult".to_string(), 1)].into_iter().collect(),
            group: Some(GroupParty {
                students: 2,
                teachers: 0,
            }),
        };

        assert_eq!(quote_total(&catalog, &selection), 999 + 2 * 399);
    }
}
