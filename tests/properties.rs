//! Property-based tests for the declaration scanner.

use docblock_checker::{scan_source, DeclarationKind, ScanConfig};
use proptest::prelude::*;

/// What sits above a declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Lead {
    Docblock,
    Comment,
    Nothing,
}

impl Lead {
    fn render(self, indent: &str) -> String {
        match self {
            Lead::Docblock => format!("{indent}/**\n{indent} * Doc.\n{indent} */\n"),
            Lead::Comment => format!("{indent}// Note.\n"),
            Lead::Nothing => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum Member {
    Method(Lead),
    /// A closure inside a documented helper method.
    Closure { documented: bool },
}

#[derive(Debug, Clone)]
struct Class {
    lead: Lead,
    members: Vec<Member>,
}

fn lead_strategy() -> impl Strategy<Value = Lead> {
    prop::sample::select(vec![Lead::Docblock, Lead::Comment, Lead::Nothing])
}

fn member_strategy() -> impl Strategy<Value = Member> {
    prop_oneof![
        lead_strategy().prop_map(Member::Method),
        any::<bool>().prop_map(|documented| Member::Closure { documented }),
    ]
}

fn class_strategy() -> impl Strategy<Value = Class> {
    (lead_strategy(), prop::collection::vec(member_strategy(), 0..5))
        .prop_map(|(lead, members)| Class { lead, members })
}

fn render(classes: &[Class]) -> String {
    let mut out = String::from("<?php\n\nnamespace App;\n\n");
    for (i, class) in classes.iter().enumerate() {
        out.push_str(&class.lead.render(""));
        out.push_str(&format!("class C{i}\n{{\n"));
        for (j, member) in class.members.iter().enumerate() {
            match member {
                Member::Method(lead) => {
                    out.push_str(&lead.render("    "));
                    out.push_str(&format!("    public function m{j}(): string\n    {{\n"));
                    out.push_str("        return \"{$this->x} }\";\n    }\n\n");
                }
                Member::Closure { documented } => {
                    out.push_str("    /** Helper. */\n");
                    out.push_str(&format!("    private static function h{j}(array $a)\n    {{\n"));
                    if *documented {
                        out.push_str("        return array_map(/** Doc. */ function ($x) { return $x; }, $a);\n");
                    } else {
                        out.push_str("        $f = function ($x) { return $x; };\n");
                        out.push_str("        return array_map($f, $a);\n");
                    }
                    out.push_str("    }\n\n");
                }
            }
        }
        out.push_str("}\n\n");
    }
    out
}

/// Expected (classes, methods, closures) findings with nothing skipped.
fn expected(classes: &[Class]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for class in classes {
        if class.lead != Lead::Docblock {
            counts.0 += 1;
        }
        for member in &class.members {
            match member {
                Member::Method(lead) if *lead != Lead::Docblock => counts.1 += 1,
                Member::Closure { documented: false } => counts.2 += 1,
                _ => {}
            }
        }
    }
    counts
}

fn counts(source: &str, config: &ScanConfig) -> (usize, usize, usize) {
    let scan = scan_source("gen.php", source, config).expect("generated source tokenizes");
    let count = |kind| scan.findings.iter().filter(|f| f.kind == kind).count();
    (
        count(DeclarationKind::Class),
        count(DeclarationKind::Method),
        count(DeclarationKind::AnonymousFunction),
    )
}

proptest! {
    #[test]
    fn prop_findings_match_undocumented_declarations(
        classes in prop::collection::vec(class_strategy(), 0..5)
    ) {
        let source = render(&classes);
        prop_assert_eq!(counts(&source, &ScanConfig::default()), expected(&classes));

        let scan = scan_source("gen.php", &source, &ScanConfig::default()).unwrap();
        prop_assert_eq!(scan.classes.len(), classes.len());
        for finding in scan.findings.iter().filter(|f| f.kind != DeclarationKind::Class) {
            prop_assert!(finding.class.is_some());
        }
    }

    #[test]
    fn prop_skip_classes_leaves_no_class_findings(
        classes in prop::collection::vec(class_strategy(), 0..5)
    ) {
        let source = render(&classes);
        let config = ScanConfig { skip_classes: true, ..Default::default() };
        let (class_count, methods, closures) = counts(&source, &config);
        let (_, expected_methods, expected_closures) = expected(&classes);
        prop_assert_eq!(class_count, 0);
        prop_assert_eq!(methods, expected_methods);
        prop_assert_eq!(closures, expected_closures);
    }

    #[test]
    fn prop_skip_anonymous_keeps_methods(
        classes in prop::collection::vec(class_strategy(), 0..5)
    ) {
        let source = render(&classes);
        let config = ScanConfig { skip_anonymous_functions: true, ..Default::default() };
        let (class_count, methods, closures) = counts(&source, &config);
        let (expected_classes, expected_methods, _) = expected(&classes);
        prop_assert_eq!(closures, 0);
        prop_assert_eq!(methods, expected_methods);
        prop_assert_eq!(class_count, expected_classes);
    }

    #[test]
    fn prop_scan_is_idempotent(body in "[a-z{}()$;'\"/*# \n<?>=&:-]{0,160}") {
        let source = format!("<?php\n{}", body);
        let config = ScanConfig::default();
        let first = scan_source("gen.php", &source, &config);
        let second = scan_source("gen.php", &source, &config);
        prop_assert_eq!(first, second);
    }
}
