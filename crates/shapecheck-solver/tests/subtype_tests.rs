use super::*;
use crate::nominal::{Builtin, Capabilities, ClassRef, Nominal};
use crate::subtype_explain::explain_subtype_failure;
use crate::types::{Capability, RecordDef, Totality};

fn sub(first: &Descriptor, second: &Descriptor) -> bool {
    SubtypeChecker::new().is_subtype(first, second)
}

fn list_subclass() -> ClassRef {
    ClassRef::new("MyList", [Nominal::Builtin(Builtin::List)])
}

// =============================================================================
// Primitives and wildcards
// =============================================================================

#[test]
fn reflexive_on_every_shape() {
    let class = ClassRef::new("Box", []);
    let shapes = [
        Descriptor::int(),
        Descriptor::list(Descriptor::str()),
        Descriptor::tuple([Descriptor::int(), Descriptor::str()]),
        Descriptor::dict(Descriptor::str(), Descriptor::int()),
        Descriptor::optional(Descriptor::str()),
        Descriptor::callable([Descriptor::int()], Descriptor::none()),
        Descriptor::protocol(Capability::Iterable, [Descriptor::int()]),
        Descriptor::generic(class, [Descriptor::int()]),
        Descriptor::Wildcard,
        Descriptor::type_var("T"),
    ];
    for shape in &shapes {
        assert!(sub(shape, shape), "{shape} should be a subtype of itself");
    }
}

#[test]
fn primitives_follow_subclassing() {
    assert!(sub(&Descriptor::bool(), &Descriptor::int()));
    assert!(!sub(&Descriptor::int(), &Descriptor::bool()));
    assert!(!sub(&Descriptor::int(), &Descriptor::float()));
    assert!(sub(&Descriptor::str(), &Descriptor::object()));

    let mine = Descriptor::class(&list_subclass());
    let list = Descriptor::builtin(Builtin::List);
    assert!(sub(&mine, &list));
    assert!(!sub(&list, &mine));
}

#[test]
fn only_any_is_a_subtype_of_any_from_any() {
    assert!(sub(&Descriptor::int(), &Descriptor::Wildcard));
    assert!(sub(&Descriptor::list(Descriptor::int()), &Descriptor::Wildcard));
    assert!(sub(&Descriptor::Wildcard, &Descriptor::Wildcard));
    assert!(!sub(&Descriptor::Wildcard, &Descriptor::int()));
    assert!(!sub(&Descriptor::Wildcard, &Descriptor::object()));
}

#[test]
fn type_variables_match_only_by_name() {
    let t = Descriptor::type_var("T");
    assert!(sub(&t, &Descriptor::type_var("T")));
    assert!(!sub(&t, &Descriptor::type_var("U")));
    assert!(!sub(&Descriptor::int(), &t));
    assert!(!sub(&t, &Descriptor::int()));
    assert!(sub(&t, &Descriptor::Wildcard));
}

// =============================================================================
// Absence and unions
// =============================================================================

#[test]
fn absence_is_none_type() {
    assert!(sub(&Descriptor::Absent, &Descriptor::none()));
    assert!(sub(&Descriptor::none(), &Descriptor::Absent));
    assert!(sub(&Descriptor::Absent, &Descriptor::optional(Descriptor::str())));
    assert!(!sub(&Descriptor::Absent, &Descriptor::str()));
}

#[test]
fn optional_widens() {
    let optional = Descriptor::optional(Descriptor::str());
    assert!(sub(&Descriptor::str(), &optional));
    assert!(!sub(&optional, &Descriptor::str()));
    assert!(!sub(&Descriptor::int(), &optional));
}

#[test]
fn union_source_requires_every_member() {
    let narrow = Descriptor::union([Descriptor::int(), Descriptor::float()]);
    let wide = Descriptor::union([Descriptor::int(), Descriptor::float(), Descriptor::str()]);
    assert!(sub(&narrow, &wide));
    assert!(!sub(&wide, &narrow));

    // Every member must fit. The looser either-member reading, where
    // `Union[bool, str] <: int` would hold because `bool <: int`, is ruled out.
    let mixed = Descriptor::union([Descriptor::bool(), Descriptor::str()]);
    assert!(!sub(&mixed, &Descriptor::int()));
    assert!(sub(
        &Descriptor::union([Descriptor::bool(), Descriptor::int()]),
        &Descriptor::int()
    ));
}

#[test]
fn union_target_accepts_any_member() {
    let target = Descriptor::union([Descriptor::int(), Descriptor::str()]);
    assert!(sub(&Descriptor::bool(), &target));
    assert!(sub(&Descriptor::str(), &target));
    assert!(!sub(&Descriptor::float(), &target));
}

#[test]
fn empty_union_only_holds_absence() {
    let empty = Descriptor::Union(Vec::new());
    assert!(sub(&Descriptor::none(), &empty));
    assert!(!sub(&Descriptor::int(), &empty));
}

// =============================================================================
// Containers
// =============================================================================

#[test]
fn bare_and_parametrized_lists() {
    let bare_builtin = Descriptor::builtin(Builtin::List);
    let bare = Descriptor::bare(Container::List);
    let of_str = Descriptor::list(Descriptor::str());
    let of_int = Descriptor::list(Descriptor::int());
    let of_any = Descriptor::list(Descriptor::Wildcard);

    assert!(sub(&bare_builtin, &bare));
    assert!(sub(&bare, &bare_builtin));
    assert!(sub(&bare_builtin, &of_int));
    assert!(sub(&of_str, &bare_builtin));
    assert!(sub(&of_str, &of_any));
    assert!(!sub(&of_any, &of_str));
    assert!(!sub(&of_int, &of_str));
    assert!(sub(&bare, &of_str));
    assert!(!sub(&Descriptor::int(), &bare));
}

#[test]
fn list_elements_are_covariant() {
    assert!(sub(
        &Descriptor::list(Descriptor::bool()),
        &Descriptor::list(Descriptor::int())
    ));
    assert!(sub(
        &Descriptor::list(Descriptor::int()),
        &Descriptor::list(Descriptor::union([Descriptor::int(), Descriptor::str()]))
    ));
    assert!(sub(
        &Descriptor::list(Descriptor::str()),
        &Descriptor::list(Descriptor::type_var("T"))
    ));
}

#[test]
fn list_subclass_roots_a_list() {
    let mine = ClassRef::new("MyList", [Nominal::Builtin(Builtin::List)]);
    assert!(sub(
        &Descriptor::generic(mine, [Descriptor::int()]),
        &Descriptor::list(Descriptor::int())
    ));
    assert!(!sub(
        &Descriptor::list(Descriptor::int()),
        &Descriptor::set(Descriptor::int())
    ));
}

#[test]
fn tuples_homogeneous_and_positional() {
    let bare = Descriptor::bare(Container::Tuple);
    let of_str = Descriptor::tuple([Descriptor::str()]);
    assert!(!sub(&bare, &of_str));
    assert!(sub(&of_str, &bare));
    assert!(sub(&of_str, &Descriptor::tuple([Descriptor::Wildcard])));

    let pair = Descriptor::tuple([Descriptor::int(), Descriptor::int()]);
    assert!(sub(&pair, &Descriptor::tuple([Descriptor::int()])));
    assert!(!sub(
        &Descriptor::tuple([Descriptor::int(), Descriptor::str()]),
        &Descriptor::tuple([Descriptor::int()])
    ));
    assert!(sub(
        &Descriptor::tuple([Descriptor::bool(), Descriptor::str()]),
        &Descriptor::tuple([Descriptor::int(), Descriptor::str()])
    ));
    assert!(!sub(
        &pair,
        &Descriptor::tuple([Descriptor::int(), Descriptor::int(), Descriptor::int()])
    ));
}

#[test]
fn mappings() {
    let str_str = Descriptor::dict(Descriptor::str(), Descriptor::str());
    let bare = Descriptor::bare(Container::Dict);

    assert!(sub(&Descriptor::builtin(Builtin::Dict), &str_str));
    assert!(sub(
        &str_str,
        &Descriptor::dict(
            Descriptor::union([Descriptor::str(), Descriptor::int()]),
            Descriptor::str()
        )
    ));
    assert!(sub(&str_str, &bare));
    // Missing arguments stand for `Any`, which only fits `Any`.
    assert!(!sub(&bare, &str_str));
    assert!(!sub(
        &str_str,
        &Descriptor::dict(Descriptor::int(), Descriptor::str())
    ));
    assert!(!sub(
        &str_str,
        &Descriptor::dict(Descriptor::str(), Descriptor::int())
    ));
}

#[test]
fn mapping_placeholders_accept_anything() {
    let placeholder = Descriptor::dict(Descriptor::type_var("KT"), Descriptor::type_var("VT"));
    assert!(sub(
        &Descriptor::dict(Descriptor::str(), Descriptor::int()),
        &placeholder
    ));
}

// =============================================================================
// Callables
// =============================================================================

#[test]
fn callables() {
    let int_to_str = Descriptor::callable([Descriptor::int()], Descriptor::str());
    let any = Descriptor::any_callable();

    assert!(sub(&Descriptor::builtin(Builtin::Function), &int_to_str));
    assert!(!sub(&Descriptor::int(), &any));
    assert!(sub(&int_to_str, &any));
    assert!(!sub(&any, &int_to_str));
    assert!(sub(&any, &any));
    assert!(sub(
        &int_to_str,
        &Descriptor::callable([Descriptor::Wildcard], Descriptor::Wildcard)
    ));
    assert!(!sub(
        &int_to_str,
        &Descriptor::callable([Descriptor::int(), Descriptor::int()], Descriptor::str())
    ));
}

#[test]
fn callable_parameters_compare_in_the_same_direction() {
    let any_any = Descriptor::callable(
        [Descriptor::Wildcard, Descriptor::Wildcard],
        Descriptor::Wildcard,
    );
    let target = Descriptor::callable(
        [
            Descriptor::union([Descriptor::int(), Descriptor::float()]),
            Descriptor::str(),
        ],
        Descriptor::Wildcard,
    );
    assert!(!sub(&any_any, &target));

    let loose = Descriptor::callable([Descriptor::Wildcard, Descriptor::float()], Descriptor::str());
    let strict = Descriptor::callable([Descriptor::int(), Descriptor::float()], Descriptor::str());
    assert!(!sub(&loose, &strict));
    assert!(sub(&strict, &loose));
}

#[test]
fn callable_classes() {
    let handler = ClassRef::builder("Handler")
        .provides(Capabilities::CALLABLE)
        .build();
    assert!(sub(&Descriptor::class(&handler), &Descriptor::any_callable()));
    assert!(sub(
        &Descriptor::generic(handler, [Descriptor::int()]),
        &Descriptor::any_callable()
    ));
    let plain = ClassRef::new("Plain", []);
    assert!(!sub(&Descriptor::class(&plain), &Descriptor::any_callable()));
}

#[test]
fn protocols_and_callables_fit_only_under_object() {
    assert!(sub(&Descriptor::any_callable(), &Descriptor::object()));
    assert!(!sub(&Descriptor::any_callable(), &Descriptor::int()));
    assert!(sub(&Descriptor::marker(Capability::Sized), &Descriptor::object()));
}

// =============================================================================
// Protocols and effects
// =============================================================================

#[test]
fn capability_markers() {
    assert!(sub(
        &Descriptor::builtin(Builtin::List),
        &Descriptor::marker(Capability::Sized)
    ));
    assert!(!sub(
        &Descriptor::set(Descriptor::int()),
        &Descriptor::marker(Capability::Reversible)
    ));
    assert!(sub(
        &Descriptor::dict(Descriptor::str(), Descriptor::int()),
        &Descriptor::marker(Capability::Reversible)
    ));
    assert!(!sub(&Descriptor::int(), &Descriptor::marker(Capability::Sized)));
}

#[test]
fn iterable_elements() {
    let iterable_int = Descriptor::protocol(Capability::Iterable, [Descriptor::int()]);
    assert!(sub(&Descriptor::list(Descriptor::int()), &iterable_int));
    assert!(!sub(&Descriptor::list(Descriptor::str()), &iterable_int));
    assert!(sub(
        &Descriptor::dict(Descriptor::int(), Descriptor::str()),
        &iterable_int
    ));
    assert!(sub(
        &Descriptor::list(Descriptor::str()),
        &Descriptor::protocol(Capability::Iterable, [Descriptor::type_var("T")])
    ));
    assert!(sub(
        &Descriptor::protocol(Capability::Reversible, [Descriptor::int()]),
        &iterable_int
    ));
    assert!(!sub(
        &iterable_int,
        &Descriptor::protocol(Capability::Reversible, [Descriptor::int()])
    ));
}

#[test]
fn generator_effects() {
    let generator = |y: Descriptor| {
        Descriptor::protocol(Capability::Generator, [y, Descriptor::none(), Descriptor::none()])
    };
    assert!(sub(&generator(Descriptor::bool()), &generator(Descriptor::int())));
    assert!(!sub(&generator(Descriptor::str()), &generator(Descriptor::int())));
    assert!(sub(
        &generator(Descriptor::str()),
        &Descriptor::marker(Capability::Generator)
    ));
    assert!(sub(
        &generator(Descriptor::str()),
        &Descriptor::protocol(
            Capability::Generator,
            [
                Descriptor::type_var("T_co"),
                Descriptor::type_var("T_contra"),
                Descriptor::type_var("V_co"),
            ]
        )
    ));
    assert!(sub(
        &generator(Descriptor::int()),
        &Descriptor::marker(Capability::Iterable)
    ));
}

#[test]
fn effects_need_the_same_capability() {
    let coroutine = Descriptor::protocol(
        Capability::Coroutine,
        [Descriptor::Wildcard, Descriptor::Wildcard, Descriptor::int()],
    );
    let generator = Descriptor::protocol(
        Capability::Generator,
        [Descriptor::Wildcard, Descriptor::Wildcard, Descriptor::int()],
    );
    assert!(!sub(&coroutine, &generator));
    assert!(sub(
        &Descriptor::builtin(Builtin::Coroutine),
        &Descriptor::marker(Capability::Coroutine)
    ));
    assert!(sub(&Descriptor::builtin(Builtin::Generator), &generator));
    assert!(!sub(&Descriptor::builtin(Builtin::Iterator), &generator));
}

#[test]
fn effect_with_fewer_arguments_than_target() {
    let short = Descriptor::protocol(Capability::AsyncGenerator, [Descriptor::int()]);
    let full = Descriptor::protocol(
        Capability::AsyncGenerator,
        [Descriptor::int(), Descriptor::none()],
    );
    assert!(!sub(&short, &full));
    assert!(sub(&full, &short));
}

// =============================================================================
// Generics
// =============================================================================

#[test]
fn user_generics() {
    let base = ClassRef::new("Box", []);
    let derived = ClassRef::new("LabelBox", [Nominal::Class(base.clone())]);

    let box_int = Descriptor::generic(base.clone(), [Descriptor::int()]);
    assert!(sub(
        &Descriptor::generic(base.clone(), [Descriptor::bool()]),
        &box_int
    ));
    assert!(!sub(
        &Descriptor::generic(base.clone(), [Descriptor::str()]),
        &box_int
    ));
    assert!(sub(
        &Descriptor::generic(derived.clone(), [Descriptor::int()]),
        &box_int
    ));
    assert!(!sub(
        &box_int,
        &Descriptor::generic(derived, [Descriptor::int()])
    ));
    assert!(!sub(
        &box_int,
        &Descriptor::generic(base.clone(), [Descriptor::int(), Descriptor::int()])
    ));

    // Nominal shortcuts in both directions.
    assert!(sub(&box_int, &Descriptor::class(&base)));
    assert!(sub(&Descriptor::class(&base), &box_int));
}

// =============================================================================
// Records
// =============================================================================

fn movie(totality: Totality) -> Descriptor {
    Descriptor::record(RecordDef::new(
        "Movie",
        [
            ("title".to_owned(), Descriptor::str()),
            ("year".to_owned(), Descriptor::int()),
        ],
        totality,
    ))
}

fn titled() -> Descriptor {
    Descriptor::record(RecordDef::new(
        "Titled",
        [("title".to_owned(), Descriptor::str())],
        Totality::Total,
    ))
}

fn book() -> Descriptor {
    Descriptor::record(RecordDef::new(
        "Book",
        [
            ("title".to_owned(), Descriptor::str()),
            ("pages".to_owned(), Descriptor::int()),
        ],
        Totality::Total,
    ))
}

#[test]
fn records_allow_width_subtyping() {
    assert!(sub(&movie(Totality::Total), &titled()));
    assert!(!sub(&titled(), &movie(Totality::Total)));
}

#[test]
fn records_keep_width_subtyping_inside_unions() {
    let either = Descriptor::union([movie(Totality::Total), book()]);
    assert!(sub(&either, &titled()));
    assert!(sub(&movie(Totality::Total), &Descriptor::optional(titled())));
    assert!(sub(&either, &Descriptor::optional(titled())));
    assert!(!sub(&titled(), &Descriptor::optional(book())));

    let reason = explain_subtype_failure(
        &Descriptor::union([movie(Totality::Total), titled()]),
        &book(),
    );
    assert!(matches!(
        reason,
        Some(SubtypeFailureReason::UnionMemberMismatch { .. })
    ));
}

#[test]
fn partial_record_is_not_a_total_one() {
    assert!(!sub(&movie(Totality::Partial), &titled()));
    assert!(sub(&movie(Totality::Total), &movie(Totality::Partial)));
}

#[test]
fn records_compare_with_mappings() {
    let record = movie(Totality::Total);
    assert!(sub(
        &record,
        &Descriptor::dict(
            Descriptor::str(),
            Descriptor::union([Descriptor::str(), Descriptor::int()])
        )
    ));
    assert!(!sub(
        &record,
        &Descriptor::dict(Descriptor::str(), Descriptor::str())
    ));
    assert!(sub(&record, &Descriptor::builtin(Builtin::Dict)));
}

// =============================================================================
// Depth limit
// =============================================================================

fn nested_list(depth: usize, leaf: Descriptor) -> Descriptor {
    (0..depth).fold(leaf, |inner, _| Descriptor::list(inner))
}

#[test]
fn depth_limit_fails_closed() {
    let first = nested_list(3, Descriptor::bool());
    let second = nested_list(3, Descriptor::int());

    let mut checker = SubtypeChecker::with_profile(RecursionProfile::Custom { max_depth: 2 });
    assert!(!checker.is_subtype(&first, &second));
    assert!(checker.depth_exceeded());

    // The default limit is deep enough.
    assert!(sub(&first, &second));
}

#[test]
fn checker_is_reusable_after_hitting_the_limit() {
    let options = CheckOptions::default().with_max_depth(2);
    let mut checker = SubtypeChecker::with_options(&options);
    assert!(!checker.is_subtype(
        &nested_list(4, Descriptor::bool()),
        &nested_list(4, Descriptor::int())
    ));
    assert!(checker.is_subtype(&Descriptor::bool(), &Descriptor::int()));
    assert!(!checker.depth_exceeded());
}

#[test]
fn deep_checks_stay_balanced() {
    let mut checker = SubtypeChecker::new();
    let first = nested_list(50, Descriptor::bool());
    let second = nested_list(50, Descriptor::int());
    assert!(checker.is_subtype(&first, &second));
    assert!(checker.depth_is_idle());
}

#[test]
fn checks_are_deterministic() {
    let first = Descriptor::dict(Descriptor::str(), Descriptor::list(Descriptor::bool()));
    let second = Descriptor::dict(
        Descriptor::str(),
        Descriptor::list(Descriptor::union([Descriptor::int(), Descriptor::none()])),
    );
    let mut checker = SubtypeChecker::new();
    let answers: Vec<bool> = (0..4).map(|_| checker.is_subtype(&first, &second)).collect();
    assert_eq!(answers, vec![true; 4]);
}

// =============================================================================
// Algebraic properties
// =============================================================================

#[test]
fn union_distributes_over_the_source() {
    let targets = [
        Descriptor::int(),
        Descriptor::object(),
        Descriptor::union([Descriptor::int(), Descriptor::str()]),
        Descriptor::list(Descriptor::int()),
        titled(),
        Descriptor::optional(titled()),
        Descriptor::dict(Descriptor::str(), Descriptor::Wildcard),
    ];
    let pairs = [
        (Descriptor::bool(), Descriptor::int()),
        (Descriptor::bool(), Descriptor::str()),
        (Descriptor::list(Descriptor::bool()), Descriptor::float()),
        (movie(Totality::Total), book()),
        (movie(Totality::Total), titled()),
    ];
    for target in &targets {
        for (a, b) in &pairs {
            let union = Descriptor::union([a.clone(), b.clone()]);
            assert_eq!(
                sub(&union, target),
                sub(a, target) && sub(b, target),
                "{union} <: {target}"
            );
        }
    }
}

#[test]
fn optional_against_wider_union() {
    let optional = Descriptor::optional(Descriptor::str());
    let wide = Descriptor::union([Descriptor::str(), Descriptor::int(), Descriptor::Absent]);
    assert!(sub(&optional, &wide));
    assert!(!sub(&wide, &optional));
}

#[test]
fn homogeneous_tuple_collapse() {
    assert!(sub(
        &Descriptor::tuple([Descriptor::str(), Descriptor::str()]),
        &Descriptor::tuple([Descriptor::str()])
    ));
    assert!(!sub(
        &Descriptor::tuple([Descriptor::str(), Descriptor::int(), Descriptor::str()]),
        &Descriptor::tuple([Descriptor::str(), Descriptor::int()])
    ));
}

#[test]
fn capabilities_are_decided_by_the_nominal_shape() {
    let dict = Descriptor::builtin(Builtin::Dict);
    let set = Descriptor::builtin(Builtin::Set);
    assert!(sub(&dict, &Descriptor::marker(Capability::Reversible)));
    assert!(sub(&dict, &Descriptor::marker(Capability::Sized)));
    assert!(!sub(&set, &Descriptor::marker(Capability::Reversible)));
    assert!(!sub(&set, &Descriptor::marker(Capability::Hashable)));
}

#[test]
fn record_matches_its_mapping_form() {
    let record = Descriptor::record(RecordDef::new(
        "Pair",
        [
            ("a".to_owned(), Descriptor::int()),
            ("b".to_owned(), Descriptor::str()),
        ],
        Totality::Total,
    ));
    assert!(sub(
        &record,
        &Descriptor::dict(
            Descriptor::str(),
            Descriptor::union([Descriptor::int(), Descriptor::str()])
        )
    ));
}
