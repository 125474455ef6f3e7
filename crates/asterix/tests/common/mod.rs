#![allow(dead_code)]

use std::collections::HashMap;

use asterix::{
    BitDef, CategorySchema, Codec, Fields, Fixed, FormatNode, SchemaTable, Subfield, Value,
};

/// Reference data block: one CAT021 ADS-B target report.
pub const CAT021_REPORT: &str = "15004EFF9FB35B83E40001080001014CFBA315CD2A4A0EAF0AE69555250757D74CFB330005554CFBA31189374B4CFB3319CAC08341C60A00500C000000F500004CFBB3414175D75820006A06D901";

pub fn hex(text: &str) -> Vec<u8> {
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).unwrap())
        .collect()
}

pub fn fields(pairs: &[(&str, Value)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn fixed(length: usize, bits: Vec<BitDef>) -> Fixed {
    Fixed::new(length, bits).unwrap()
}

fn item(length: usize, bits: Vec<BitDef>) -> FormatNode {
    FormatNode::Fixed(fixed(length, bits))
}

fn time_of_day() -> FormatNode {
    item(3, vec![BitDef::range("ToD", 24, 1).scaled(1.0 / 128.0)])
}

fn time_high_precision() -> FormatNode {
    item(
        4,
        vec![
            BitDef::range("FSI", 32, 31),
            BitDef::range("ToD", 30, 1).scaled(1.0 / (1u64 << 30) as f64),
        ],
    )
}

fn variable(blocks: Vec<Fixed>) -> FormatNode {
    FormatNode::variable(blocks).unwrap()
}

/// CAT021 (ADS-B target reports) layout, edition 2.1 numbering.
pub fn cat021() -> CategorySchema {
    let wgs84_low = 180.0 / (1u64 << 23) as f64;
    let wgs84_high = 180.0 / (1u64 << 30) as f64;

    let mut items = HashMap::new();
    let mut add = |id: &str, node: FormatNode| {
        items.insert(id.to_string(), node);
    };

    add(
        "010",
        item(2, vec![BitDef::range("SAC", 16, 9), BitDef::range("SIC", 8, 1)]),
    );
    add(
        "040",
        variable(vec![
            fixed(
                1,
                vec![
                    BitDef::range("ATP", 8, 6),
                    BitDef::range("ARC", 5, 4),
                    BitDef::bit("RC", 3),
                    BitDef::bit("RAB", 2),
                    BitDef::bit("FX", 1),
                ],
            ),
            fixed(
                1,
                vec![
                    BitDef::bit("DCR", 8),
                    BitDef::bit("GBS", 7),
                    BitDef::bit("SIM", 6),
                    BitDef::bit("TST", 5),
                    BitDef::bit("SAA", 4),
                    BitDef::range("CL", 3, 2),
                    BitDef::bit("FX", 1),
                ],
            ),
            fixed(
                1,
                vec![
                    BitDef::bit("spare", 8),
                    BitDef::bit("IPC", 7),
                    BitDef::bit("NOGO", 6),
                    BitDef::bit("CPR", 5),
                    BitDef::bit("LDPJ", 4),
                    BitDef::bit("RCF", 3),
                    BitDef::bit("FX", 1),
                ],
            ),
        ]),
    );
    add(
        "161",
        item(2, vec![BitDef::range("spare", 16, 13), BitDef::range("TrackN", 12, 1)]),
    );
    add("015", item(1, vec![BitDef::range("SID", 8, 1)]));
    add("071", time_of_day());
    add(
        "130",
        item(
            6,
            vec![
                BitDef::range("Lat", 48, 25).signed().scaled(wgs84_low),
                BitDef::range("Lon", 24, 1).signed().scaled(wgs84_low),
            ],
        ),
    );
    add(
        "131",
        item(
            8,
            vec![
                BitDef::range("Lat", 64, 33).signed().scaled(wgs84_high),
                BitDef::range("Lon", 32, 1).signed().scaled(wgs84_high),
            ],
        ),
    );
    add("072", time_of_day());
    add("080", item(3, vec![BitDef::range("TAddr", 24, 1)]));
    add("073", time_of_day());
    add("074", time_high_precision());
    add("075", time_of_day());
    add("076", time_high_precision());
    add(
        "140",
        item(2, vec![BitDef::range("GH", 16, 1).signed().scaled(6.25)]),
    );
    add(
        "090",
        variable(vec![
            fixed(
                1,
                vec![
                    BitDef::range("NUCr_or_NACv", 8, 6),
                    BitDef::range("NUCp_or_NIC", 5, 2),
                    BitDef::bit("FX", 1),
                ],
            ),
            fixed(
                1,
                vec![
                    BitDef::bit("NICbaro", 8),
                    BitDef::range("SIL", 7, 6),
                    BitDef::range("NACp", 5, 2),
                    BitDef::bit("FX", 1),
                ],
            ),
            fixed(
                1,
                vec![
                    BitDef::range("spare", 8, 7),
                    BitDef::bit("SILS", 6),
                    BitDef::range("SDA", 5, 4),
                    BitDef::range("GVA", 3, 2),
                    BitDef::bit("FX", 1),
                ],
            ),
        ]),
    );
    add(
        "210",
        item(
            1,
            vec![
                BitDef::bit("spare", 8),
                BitDef::bit("VNS", 7),
                BitDef::range("VN", 6, 4),
                BitDef::range("LTT", 3, 1),
            ],
        ),
    );
    add(
        "070",
        item(2, vec![BitDef::range("spare", 16, 13), BitDef::range("Mode3A", 12, 1)]),
    );
    add(
        "145",
        item(2, vec![BitDef::range("FL", 16, 1).signed().scaled(0.25)]),
    );
    add(
        "200",
        item(
            1,
            vec![
                BitDef::bit("ICF", 8),
                BitDef::bit("LNAV", 7),
                BitDef::bit("ME", 6),
                BitDef::range("PS", 5, 3),
                BitDef::range("SS", 2, 1),
            ],
        ),
    );
    add(
        "157",
        item(
            2,
            vec![
                BitDef::bit("RE", 16),
                BitDef::range("GVR", 15, 1).signed().scaled(6.25),
            ],
        ),
    );
    add(
        "160",
        item(
            4,
            vec![
                BitDef::bit("RE", 32),
                BitDef::range("GS", 31, 17).scaled(1.0 / (1u64 << 14) as f64),
                BitDef::range("TA", 16, 1).scaled(360.0 / (1u64 << 16) as f64),
            ],
        ),
    );
    add("077", time_of_day());
    add("170", item(6, vec![BitDef::range("TId", 48, 1)]));
    add("020", item(1, vec![BitDef::range("ECAT", 8, 1)]));
    add(
        "220",
        FormatNode::compound(vec![
            Subfield::new("WS", item(2, vec![BitDef::range("WS", 16, 1)])),
            Subfield::new("WD", item(2, vec![BitDef::range("WD", 16, 1)])),
            Subfield::new(
                "TMP",
                item(2, vec![BitDef::range("TMP", 16, 1).signed().scaled(0.25)]),
            ),
            Subfield::new("TRB", item(1, vec![BitDef::range("TRB", 8, 1)])),
        ])
        .unwrap(),
    );
    add(
        "110",
        FormatNode::compound(vec![
            Subfield::new(
                "TIS",
                variable(vec![fixed(
                    1,
                    vec![
                        BitDef::bit("NAV", 8),
                        BitDef::bit("NVB", 7),
                        BitDef::range("spare", 6, 2),
                        BitDef::bit("FX", 1),
                    ],
                )]),
            ),
            Subfield::new(
                "TID",
                FormatNode::Repetitive(fixed(
                    15,
                    vec![
                        BitDef::bit("TCA", 120),
                        BitDef::bit("NC", 119),
                        BitDef::range("TCPNumber", 118, 113),
                        BitDef::range("Altitude", 112, 97).signed().scaled(10.0),
                        BitDef::range("Latitude", 96, 73).signed().scaled(wgs84_low),
                        BitDef::range("Longitude", 72, 49).signed().scaled(wgs84_low),
                        BitDef::range("PointType", 48, 45),
                        BitDef::range("TD", 44, 43),
                        BitDef::bit("TRA", 42),
                        BitDef::bit("TOA", 41),
                        BitDef::range("TOV", 40, 17),
                        BitDef::range("TTR", 16, 1).scaled(0.01),
                    ],
                )),
            ),
        ])
        .unwrap(),
    );
    add("016", item(1, vec![BitDef::range("RP", 8, 1).scaled(0.5)]));
    add(
        "008",
        item(
            1,
            vec![
                BitDef::bit("RA", 8),
                BitDef::range("TC", 7, 6),
                BitDef::bit("TS", 5),
                BitDef::bit("ARV", 4),
                BitDef::bit("CDTIA", 3),
                BitDef::bit("notTCAS", 2),
                BitDef::bit("SA", 1),
            ],
        ),
    );
    add(
        "271",
        variable(vec![
            fixed(
                1,
                vec![
                    BitDef::range("spare", 8, 7),
                    BitDef::bit("POA", 6),
                    BitDef::bit("CDTIS", 5),
                    BitDef::bit("B2low", 4),
                    BitDef::bit("RAS", 3),
                    BitDef::bit("IDENT", 2),
                    BitDef::bit("FX", 1),
                ],
            ),
            fixed(
                1,
                vec![
                    BitDef::range("LW", 8, 5),
                    BitDef::range("spare", 4, 2),
                    BitDef::bit("FX", 1),
                ],
            ),
        ]),
    );
    add("132", item(1, vec![BitDef::range("MAM", 8, 1).signed()]));
    add("400", item(1, vec![BitDef::range("RID", 8, 1)]));

    let frns = [
        "010", "040", "161", "015", "071", "130", "131", //
        "072", "150", "151", "080", "073", "074", "075", //
        "076", "140", "090", "210", "070", "230", "145", //
        "152", "200", "155", "157", "160", "165", "077", //
        "170", "020", "220", "146", "148", "110", "016", //
        "008", "271", "132", "250", "260", "400", "295", //
        "-", "-", "-", "-", "-", "RE", "SP",
    ];

    CategorySchema::with_frns(21, frns, items).unwrap()
}

pub fn cat021_codec() -> Codec {
    let mut table = SchemaTable::new();
    table.insert(cat021());
    Codec::new(table)
}
