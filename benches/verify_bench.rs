use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use avc::diag::Location;
use avc::model::*;
use avc::types::Type;

// Scaling scenarios: every action exercises all four passes (typed add,
// nullable load narrowed by a conditional, backend call, trailing show).

fn stmt(kind: StatementKind, line: u32) -> Statement {
    Statement {
        kind,
        loc: Location::new(line, 3),
    }
}

fn assign(name: &str, value: &str) -> FieldAssign {
    FieldAssign {
        name: name.into(),
        value: value.into(),
    }
}

fn generate_model(n_actions: usize) -> (AppModel, Backend) {
    let user = Data {
        name: "User".into(),
        fields: vec![
            Field {
                name: "name".into(),
                ty: Type::Text,
                constraints: vec![FieldConstraint::Required],
                loc: Location::default(),
            },
            Field {
                name: "age".into(),
                ty: Type::Number,
                constraints: vec![],
                loc: Location::default(),
            },
            Field {
                name: "manager".into(),
                ty: Type::nullable(Type::model("User")),
                constraints: vec![],
                loc: Location::default(),
            },
        ],
        loc: Location::default(),
    };

    let mut endpoints = Vec::new();
    let mut actions = Vec::new();
    for i in 0..n_actions {
        let path = format!("/users/{i}/:id");
        endpoints.push(Endpoint {
            method: "GET".into(),
            path: path.clone(),
            parameters: vec![],
        });
        let ops = vec![
            stmt(
                StatementKind::Load(LoadStmt {
                    method: "GET".into(),
                    path: path.clone(),
                    target: Some("boss".into()),
                    ty: Some(Type::model("User")),
                }),
                1,
            ),
            stmt(
                StatementKind::If(IfStmt {
                    condition: "boss exists".into(),
                    then: vec![stmt(
                        StatementKind::Add(AddStmt {
                            data: "User".into(),
                            fields: vec![
                                assign("name", "userName"),
                                assign("age", "42"),
                                assign("manager", "boss"),
                            ],
                        }),
                        3,
                    )],
                    otherwise: vec![],
                }),
                2,
            ),
            stmt(
                StatementKind::Call(CallStmt {
                    method: "POST".into(),
                    path: "/audit".into(),
                    fields: vec![assign("who", "id")],
                }),
                4,
            ),
            stmt(StatementKind::Show(ShowStmt { view: "Home".into() }), 5),
        ];
        actions.push(Action {
            name: format!("action_{i}"),
            params: vec![
                Param {
                    name: "userName".into(),
                    ty: Type::Text,
                },
                Param {
                    name: "id".into(),
                    ty: Type::Id,
                },
            ],
            ops,
            loc: Location::default(),
        });
    }

    let app = AppModel {
        datas: vec![user],
        views: vec![View {
            name: "Home".into(),
            loc: Location::default(),
        }],
        actions,
    };
    (app, Backend { endpoints })
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    for n in [1usize, 10, 100, 1000] {
        let (app, backend) = generate_model(n);
        group.bench_with_input(BenchmarkId::new("actions", n), &n, |b, _| {
            b.iter(|| avc::verify(black_box(&app), black_box(Some(&backend))))
        });
    }
    group.finish();
}

fn bench_type_parse(c: &mut Criterion) {
    c.bench_function("type_parse", |b| {
        b.iter(|| black_box("[User | null]?").parse::<Type>())
    });
}

criterion_group!(benches, bench_verify, bench_type_parse);
criterion_main!(benches);
