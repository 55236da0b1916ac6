use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pizzeria_auth::Principal;
use pizzeria_core::{AggregateId, CustomerId, Money};
use pizzeria_infra::{InMemoryPurchaseRepository, PurchaseService};
use pizzeria_menu::{Pizza, PizzaId};
use pizzeria_pricing::DiscountEngine;

fn pizza(topping: &str, cents: i64) -> Pizza {
    Pizza::new(PizzaId::new(AggregateId::new()), Money::from_minor(cents), [topping]).unwrap()
}

fn service() -> PurchaseService<InMemoryPurchaseRepository> {
    PurchaseService::new(InMemoryPurchaseRepository::new(), DiscountEngine::default())
}

/// Add → confirm → pick → complete for a single customer.
fn bench_full_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("purchase_full_lifecycle");

    for pizzas in [1usize, 3, 10] {
        group.throughput(Throughput::Elements(pizzas as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pizzas), &pizzas, |b, &pizzas| {
            let service = service();
            let staff = Principal::staff(CustomerId::new());
            b.iter(|| {
                let customer = Principal::customer(CustomerId::new());
                for i in 0..pizzas {
                    service
                        .add_pizza(&customer, pizza("mozzarella", 1000 + i as i64))
                        .unwrap();
                }
                service.confirm(&customer).unwrap();
                let picked = service.pick_next(&staff).unwrap().unwrap();
                black_box(service.complete(&staff, picked.id_typed()).unwrap());
            });
        });
    }

    group.finish();
}

/// Picking the oldest order scans every stored purchase.
fn bench_pick_with_backlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("purchase_pick_backlog");

    for backlog in [10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(backlog), &backlog, |b, &backlog| {
            let service = service();
            let staff = Principal::staff(CustomerId::new());
            for _ in 0..backlog {
                let customer = Principal::customer(CustomerId::new());
                service.add_pizza(&customer, pizza("basil", 900)).unwrap();
                service.confirm(&customer).unwrap();
            }
            // Keep the backlog constant: every pick is replaced by a new order.
            b.iter(|| {
                let customer = Principal::customer(CustomerId::new());
                service.add_pizza(&customer, pizza("basil", 900)).unwrap();
                service.confirm(&customer).unwrap();
                black_box(service.pick_next(&staff).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_lifecycle, bench_pick_with_backlog);
criterion_main!(benches);
