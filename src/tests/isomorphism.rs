use super::macros::*;
use crate::prelude::*;
use petgraph::graph::NodeIndex;

fn atom(symbol: &str) -> AtomDescription {
    AtomDescription::new(symbol)
}

fn label(mut mol: Molecule, idx: usize, label: &str) -> Molecule {
    mol.atom_mut(NodeIndex::new(idx)).unwrap().label = Some(label.to_string());
    mol
}

#[track_caller]
fn check_mappings(host: &Molecule, pattern_atoms: usize, mappings: &[Mapping]) {
    for mapping in mappings {
        assert_eq!(mapping.len(), pattern_atoms.min(host.atom_count()));
        for (key, value) in mapping {
            assert!(host.contains_atom(*key));
            assert!(value.index() < pattern_atoms);
        }
    }
}

#[test]
fn resonance_isomers() {
    trace_capture!();
    let a = smiles!("C=CC=C[CH]C");
    let b = smiles!("C[CH]C=CC=C");
    let options = IsomorphismOptions::new();
    assert!(a.is_isomorphic(&b, &options));
    assert!(b.is_isomorphic(&a, &options));
    let mappings = a.find_isomorphism(&b, &options);
    assert!(!mappings.is_empty());
    check_mappings(&a, b.atom_count(), &mappings);
}

#[test]
fn symmetric() {
    let pairs = [
        (smiles!("CCO"), smiles!("COC")),
        (smiles!("c1ccccc1"), smiles!("C1=CC=CC=C1")),
        (smiles!("C1CC2CCC1C2"), smiles!("C2CC1CCC2C1")),
        (smiles!("CC(C)C"), smiles!("CCCC")),
    ];
    let strict = IsomorphismOptions::new();
    let lax = IsomorphismOptions::new().with_strict(false);
    for (a, b) in &pairs {
        assert_eq!(a.is_isomorphic(b, &strict), b.is_isomorphic(a, &strict));
        assert_eq!(a.is_isomorphic(b, &lax), b.is_isomorphic(a, &lax));
    }
    assert!(!pairs[0].0.is_isomorphic(&pairs[0].1, &strict));
    assert!(!pairs[1].0.is_isomorphic(&pairs[1].1, &strict));
    assert!(pairs[1].0.is_isomorphic(&pairs[1].1, &lax));
    assert!(pairs[2].0.is_isomorphic(&pairs[2].1, &strict));
    assert!(!pairs[3].0.is_isomorphic(&pairs[3].1, &lax));
}

fn labeled_pentadienyl(h_methyl: usize, h_label: usize) -> Molecule {
    let mut atoms = vec![
        atom("C").with_label("*1"),
        atom("C"),
        atom("C"),
        atom("C"),
        atom("C").with_radicals(1),
        atom("H"),
        atom("C"),
    ];
    atoms.extend((7..15).map(|_| atom("H")));
    atoms[h_label] = atom("H").with_label("*2");
    let mut desc = MoleculeDescription::new().with_multiplicity(2);
    desc.atoms = atoms;
    let bonds = [
        (0, 1, 'D'),
        (0, h_label, 'S'),
        (0, 8, 'S'),
        (1, 2, 'S'),
        (1, 9, 'S'),
        (2, 3, 'D'),
        (2, 10, 'S'),
        (3, 4, 'S'),
        (3, 11, 'S'),
        (4, 5, 'S'),
        (4, 6, 'S'),
        (6, h_methyl, 'S'),
        (6, 13, 'S'),
        (6, 14, 'S'),
    ];
    for (a, b, order) in bonds {
        desc = desc.with_bond(a, b, BondOrder::from_symbol(order).unwrap());
    }
    Molecule::from_description(&desc).unwrap()
}

#[test]
fn generated_initial_map() {
    let a = labeled_pentadienyl(12, 7);
    let b = labeled_pentadienyl(7, 12);
    let options = IsomorphismOptions::new().with_generated_initial_map(true);
    assert!(a.is_isomorphic(&b, &options));
    assert!(b.is_isomorphic(&a, &options));
    for mapping in a.find_isomorphism(&b, &options) {
        assert_eq!(mapping[&NodeIndex::new(0)], NodeIndex::new(0));
        assert_eq!(mapping[&NodeIndex::new(7)], NodeIndex::new(12));
    }

    // labels have to line up
    let unlabeled = smiles!("C=CC=C[CH]C");
    assert!(unlabeled.is_isomorphic(&a, &IsomorphismOptions::new()));
    assert!(!unlabeled.is_isomorphic(&a, &options));
}

#[test]
fn explicit_initial_map() {
    let a = smiles!("CCO");
    let b = smiles!("OCC");
    let good = Mapping::from([(NodeIndex::new(2), NodeIndex::new(0))]);
    let bad = Mapping::from([(NodeIndex::new(0), NodeIndex::new(0))]);
    assert!(a.is_isomorphic(&b, &IsomorphismOptions::new().with_initial_map(good)));
    assert!(!a.is_isomorphic(&b, &IsomorphismOptions::new().with_initial_map(bad)));
}

#[test]
fn double_bond_group() {
    let mol = smiles!("C=CC=C[CH]C");
    let mut group = Group::new();
    let a = group.add_atom(
        GroupAtom::new([AtomClass::Element(6)])
            .with_radicals([0])
            .with_charges([0]),
    );
    let b = group.add_atom(
        GroupAtom::new([AtomClass::Element(6)])
            .with_radicals([0])
            .with_charges([0]),
    );
    group.add_bond(a, b, BondOrder::DOUBLE).unwrap();

    let options = IsomorphismOptions::new();
    assert!(mol.is_subgraph_isomorphic(&group, &options));
    let mappings = mol.find_subgraph_isomorphisms(&group, &options);
    assert_eq!(mappings.len(), 4);
    check_mappings(&mol, group.atom_count(), &mappings);

    let first = mol.find_subgraph_isomorphisms(&group, &options.clone().with_max_mappings(1));
    assert_eq!(first.len(), 1);
}

#[test]
fn pinned_hexadiene() {
    let mol = label(smiles!("C=CC=CCC"), 0, "*");
    let mut group = Group::new();
    let star = group.add_atom(
        GroupAtom::new([AtomClass::Element(6)])
            .with_radicals([0])
            .with_label("*"),
    );
    let other = group.add_atom(GroupAtom::new([AtomClass::Element(6)]).with_radicals([0]));
    let h1 = group.add_atom(GroupAtom::new([AtomClass::Element(1)]));
    let h2 = group.add_atom(GroupAtom::new([AtomClass::Element(1)]));
    group.add_bond(star, other, BondOrder::DOUBLE).unwrap();
    group.add_bond(star, h1, BondOrder::SINGLE).unwrap();
    group.add_bond(star, h2, BondOrder::SINGLE).unwrap();

    let pinned = Mapping::from([(mol.labeled_atom("*").unwrap(), star)]);
    let options = IsomorphismOptions::new().with_initial_map(pinned);
    assert!(mol.is_subgraph_isomorphic(&group, &options));
    let mappings = mol.find_subgraph_isomorphisms(&group, &options);
    assert_eq!(mappings.len(), 2);
    check_mappings(&mol, group.atom_count(), &mappings);

    // pairing the labels does the same thing
    let generated = IsomorphismOptions::new().with_generated_initial_map(true);
    assert_eq!(mol.find_subgraph_isomorphisms(&group, &generated).len(), 2);

    // the terminal CH2 is the only carbon that fits, pinned or not
    assert_eq!(
        mol.find_subgraph_isomorphisms(&group, &IsomorphismOptions::new())
            .len(),
        2
    );
}

#[test]
fn heavy_neighbors() {
    let mol = label(smiles!("[CH]1CC1"), 0, "*1");
    assert_eq!(mol.atom(NodeIndex::new(0)).unwrap().radicals, 1);
    let mut group = Group::new();
    let center = group.add_atom(
        GroupAtom::new([AtomClass::Element(6)])
            .with_radicals([1])
            .with_label("*1"),
    );
    for _ in 0..2 {
        let n = group.add_atom(GroupAtom::new([AtomClass::Heavy]).with_radicals([0]));
        group.add_bond(center, n, BondOrder::SINGLE).unwrap();
    }
    let pinned = Mapping::from([(NodeIndex::new(0), center)]);
    let options = IsomorphismOptions::new().with_initial_map(pinned);
    assert!(mol.is_subgraph_isomorphic(&group, &options));
    let mappings = mol.find_subgraph_isomorphisms(&group, &options);
    assert_eq!(mappings.len(), 2);
    check_mappings(&mol, group.atom_count(), &mappings);
}

#[test]
fn ring_constraints() {
    let mol = smiles!("C1CCCC1CCC");
    let chain = {
        let mut g = Group::new();
        g.add_atom(
            GroupAtom::new([AtomClass::Element(6)])
                .with_radicals([0])
                .with_ring(false),
        );
        g
    };
    let ring = {
        let mut g = Group::new();
        g.add_atom(
            GroupAtom::new([AtomClass::Element(6)])
                .with_radicals([0])
                .with_ring(true),
        );
        g
    };
    let options = IsomorphismOptions::new();
    assert!(mol.is_subgraph_isomorphic(&chain, &options));
    assert_eq!(mol.find_subgraph_isomorphisms(&chain, &options).len(), 3);
    assert!(mol.is_subgraph_isomorphic(&ring, &options));
    assert_eq!(mol.find_subgraph_isomorphisms(&ring, &options).len(), 5);
}

#[test]
fn lax_radical_resonance() {
    let a = describe!(
        [
            atom("O").with_lone_pairs(2),
            atom("C").with_radicals(1),
            atom("C"),
            atom("H"),
            atom("H"),
            atom("H"),
        ],
        [(0, 2, 'D'), (1, 2, 'S'), (1, 3, 'S'), (1, 4, 'S'), (2, 5, 'S')]
    );
    let b = describe!(
        [
            atom("O").with_radicals(1).with_lone_pairs(2),
            atom("C"),
            atom("C"),
            atom("H"),
            atom("H"),
            atom("H"),
        ],
        [(0, 2, 'S'), (1, 2, 'D'), (1, 3, 'S'), (1, 4, 'S'), (2, 5, 'S')]
    );
    let lax = IsomorphismOptions::new().with_strict(false);
    assert!(a.is_isomorphic(&b, &lax));
    assert!(b.is_isomorphic(&a, &lax));
    assert!(!a.is_isomorphic(&b, &IsomorphismOptions::new()));
}

#[test]
fn molecule_patterns() {
    let propane = smiles!("CCC");
    let ethane = smiles!("CC");
    let options = IsomorphismOptions::new();
    // every ethane carbon needs three hydrogens, and no C-C bond in propane has that on both ends
    assert!(!propane.is_subgraph_isomorphic(&ethane, &options));
    let heavy_only = {
        let mut m = Molecule::new();
        let a = m.add_atom(Atom::new(6));
        let b = m.add_atom(Atom::new(6));
        m.add_bond(a, b, BondOrder::SINGLE).unwrap();
        m
    };
    let mappings = propane.find_subgraph_isomorphisms(&heavy_only, &options);
    assert_eq!(mappings.len(), 4);
    check_mappings(&propane, 2, &mappings);

    let group = propane.to_group();
    assert_eq!(group.atom_count(), propane.atom_count());
    assert_eq!(group.bond_count(), propane.bond_count());
    assert!(propane.is_subgraph_isomorphic(&group, &options));
    assert!(!smiles!("CCO").is_subgraph_isomorphic(&group, &options));
}

#[test]
fn strict_patterns_need_specific_cases() {
    let enol = smiles!("C=CO");
    let pair = |order: BondOrder, charge: i8| {
        let mut m = Molecule::new();
        let a = m.add_atom(Atom::new(6));
        let mut charged = Atom::new(6);
        charged.charge = charge;
        let b = m.add_atom(charged);
        m.add_bond(a, b, order).unwrap();
        m
    };
    let strict = IsomorphismOptions::new();
    let lax = IsomorphismOptions::new().with_strict(false);

    // the pattern leaves lone pairs unknown, which any host carbon satisfies
    let vinyl = pair(BondOrder::DOUBLE, 0);
    assert_eq!(enol.find_subgraph_isomorphisms(&vinyl, &strict).len(), 2);

    let single = pair(BondOrder::SINGLE, 0);
    assert!(!enol.is_subgraph_isomorphic(&single, &strict));
    assert!(enol.is_subgraph_isomorphic(&single, &lax));

    let cation = pair(BondOrder::DOUBLE, 1);
    assert!(!enol.is_subgraph_isomorphic(&cation, &strict));
    assert!(enol.is_subgraph_isomorphic(&cation, &lax));
}

#[test]
fn mapping_counts_ignore_atom_order() {
    let options = IsomorphismOptions::new();
    let ethyl = {
        let mut m = Molecule::new();
        let a = m.add_atom(Atom::new(6));
        let b = m.add_atom(Atom::new(6));
        m.add_bond(a, b, BondOrder::SINGLE).unwrap();
        m
    };
    for mol in [smiles!("C1C2C3C=CCCC2C13"), smiles!("CC(C)c1ccccc1O")] {
        let automorphisms = mol.find_isomorphism(&mol, &options).len();
        let bonds = mol.find_subgraph_isomorphisms(&ethyl, &options).len();
        assert!(automorphisms > 0 && bonds > 0);
        for seed in 0..100 {
            let reordered = shuffled(&mol, seed);
            assert_eq!(
                reordered.find_isomorphism(&mol, &options).len(),
                automorphisms,
                "seed {seed}"
            );
            assert_eq!(
                reordered.find_subgraph_isomorphisms(&ethyl, &options).len(),
                bonds,
                "seed {seed}"
            );
        }
    }
}
