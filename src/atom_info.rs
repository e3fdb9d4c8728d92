//! This file is pretty much a periodic table

/// Static data for a single element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Standard atomic weight, in g/mol
    pub mass: f64,
    /// Electrons in the outer shell, `0` where lone pairs aren't tracked
    pub valence_electrons: u8,
    /// Usual number of bonds for a neutral, closed-shell atom
    pub valence: u8,
}
impl Element {
    pub const fn new(
        number: u8,
        symbol: &'static str,
        name: &'static str,
        mass: f64,
        valence_electrons: u8,
        valence: u8,
    ) -> Self {
        Self {
            number,
            symbol,
            name,
            mass,
            valence_electrons,
            valence,
        }
    }
}

/// A specific isotope, identified by its mass number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotope {
    pub number: u8,
    pub mass_number: u16,
    pub symbol: &'static str,
    /// Isotopic mass, in g/mol
    pub mass: f64,
}

/// All of the elements the engine knows about, sorted by atomic number
pub static ELEMENTS: &[Element] = &[
    Element::new(1,  "H",  "hydrogen",   1.00794,  1, 1),
    Element::new(2,  "He", "helium",     4.002602, 2, 0),
    Element::new(3,  "Li", "lithium",    6.941,    1, 1),
    Element::new(4,  "Be", "beryllium",  9.012182, 2, 2),
    Element::new(5,  "B",  "boron",      10.811,   3, 3),
    Element::new(6,  "C",  "carbon",     12.0107,  4, 4),
    Element::new(7,  "N",  "nitrogen",   14.0067,  5, 3),
    Element::new(8,  "O",  "oxygen",     15.9994,  6, 2),
    Element::new(9,  "F",  "fluorine",   18.998403, 7, 1),
    Element::new(10, "Ne", "neon",       20.1797,  8, 0),
    Element::new(11, "Na", "sodium",     22.989770, 1, 1),
    Element::new(12, "Mg", "magnesium",  24.3050,  2, 2),
    Element::new(13, "Al", "aluminium",  26.981538, 3, 3),
    Element::new(14, "Si", "silicon",    28.0855,  4, 4),
    Element::new(15, "P",  "phosphorus", 30.973761, 5, 3),
    Element::new(16, "S",  "sulfur",     32.065,   6, 2),
    Element::new(17, "Cl", "chlorine",   35.453,   7, 1),
    Element::new(18, "Ar", "argon",      39.948,   8, 0),
    Element::new(19, "K",  "potassium",  39.0983,  1, 1),
    Element::new(20, "Ca", "calcium",    40.078,   2, 2),
    Element::new(21, "Sc", "scandium",   44.955910, 0, 0),
    Element::new(22, "Ti", "titanium",   47.867,   0, 0),
    Element::new(23, "V",  "vanadium",   50.9415,  0, 0),
    Element::new(24, "Cr", "chromium",   51.9961,  0, 0),
    Element::new(25, "Mn", "manganese",  54.938049, 0, 0),
    Element::new(26, "Fe", "iron",       55.845,   0, 0),
    Element::new(27, "Co", "cobalt",     58.933200, 0, 0),
    Element::new(28, "Ni", "nickel",     58.6934,  0, 0),
    Element::new(29, "Cu", "copper",     63.546,   0, 0),
    Element::new(30, "Zn", "zinc",       65.409,   0, 0),
    Element::new(31, "Ga", "gallium",    69.723,   3, 3),
    Element::new(32, "Ge", "germanium",  72.64,    4, 4),
    Element::new(33, "As", "arsenic",    74.92160, 5, 3),
    Element::new(34, "Se", "selenium",   78.96,    6, 2),
    Element::new(35, "Br", "bromine",    79.904,   7, 1),
    Element::new(36, "Kr", "krypton",    83.798,   8, 0),
    Element::new(53, "I",  "iodine",     126.90447, 7, 1),
    Element::new(54, "Xe", "xenon",      131.293,  8, 0),
];

/// Isotopes that can be addressed explicitly
pub static ISOTOPES: &[Isotope] = &[
    Isotope { number: 1, mass_number: 1, symbol: "H", mass: 1.00782503 },
    Isotope { number: 1, mass_number: 2, symbol: "D", mass: 2.01410178 },
    Isotope { number: 1, mass_number: 3, symbol: "T", mass: 3.01604928 },
    Isotope { number: 6, mass_number: 12, symbol: "C", mass: 12.0 },
    Isotope { number: 6, mass_number: 13, symbol: "C", mass: 13.00335484 },
    Isotope { number: 6, mass_number: 14, symbol: "C", mass: 14.00324199 },
    Isotope { number: 7, mass_number: 15, symbol: "N", mass: 15.00010890 },
    Isotope { number: 8, mass_number: 17, symbol: "O", mass: 16.99913175 },
    Isotope { number: 8, mass_number: 18, symbol: "O", mass: 17.99915961 },
    Isotope { number: 16, mass_number: 34, symbol: "S", mass: 33.96786700 },
    Isotope { number: 17, mass_number: 37, symbol: "Cl", mass: 36.96590259 },
];

/// Look an element up by its atomic number.
pub fn element_by_number(number: u8) -> Option<&'static Element> {
    ELEMENTS
        .binary_search_by_key(&number, |e| e.number)
        .ok()
        .map(|i| &ELEMENTS[i])
}

/// Look an element up by its symbol. `D` and `T` resolve to hydrogen.
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    match symbol {
        "D" | "T" => element_by_number(1),
        _ => ELEMENTS.iter().find(|e| e.symbol == symbol),
    }
}

/// Look an isotope up by atomic number and mass number.
pub fn isotope(number: u8, mass_number: u16) -> Option<&'static Isotope> {
    ISOTOPES
        .iter()
        .find(|i| i.number == number && i.mass_number == mass_number)
}

/// The mass number implied by an isotope symbol, if the symbol names one.
pub fn isotope_by_symbol(symbol: &str) -> Option<&'static Isotope> {
    match symbol {
        "D" => isotope(1, 2),
        "T" => isotope(1, 3),
        _ => None,
    }
}
