//! Regex patterns for the fixed-layout invoice parsers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Gate: header value on the line after its label
    pub static ref GATE_INVOICE_NO: Regex = Regex::new(
        r"INVOICE NO\..*?\n.*?(\b[0-9]+I\b)"
    ).unwrap();

    pub static ref GATE_INVOICE_DATE: Regex = Regex::new(
        r"INVOICE DATE.*?\n.*?(\b[0-9]{2}-[A-Z]{3}-[0-9]{4}\b)"
    ).unwrap();

    pub static ref GATE_SHIPMENT_NO: Regex = Regex::new(
        r"SHIPMENT NO:.*?\n.*?(\b[0-9]{7}\b)"
    ).unwrap();

    pub static ref GATE_PURCHASE_ORDER: Regex = Regex::new(
        r"PURCHASE ORD NO:.*?\n.*?(\b[0-9]{2}-[0-9]{4}\s+[A-Za-z0-9]+)"
    ).unwrap();

    pub static ref GATE_CUSTOMER_NO: Regex = Regex::new(
        r"CUSTOMER NO:.*?\n.*?(\b[0-9]{6}\b)"
    ).unwrap();

    // Gate: <qty> EA <description> <product no> <n> <unit price> <total>
    pub static ref GATE_LINE: Regex = Regex::new(
        r"(?m)(\d+)\s+EA\s+([A-Z0-9\- ]+)\s+([0-9]{5,12})\s+\d+\s+([\d.]+)\s+([\d.]+)"
    ).unwrap();

    // Sofabex: <ln> <code> [<code2>] <description> [<brand>] <qty> <price>
    pub static ref SOFABEX_LINE: Regex = Regex::new(
        r"^\s*(\d+)\s+([A-Z0-9\-]+)\s+([A-Z0-9\-]*)?\s+(.+?)\s+([A-Z]{2,10})?\s+(\d{1,10})\s+(\d+[,.]\d+)$"
    ).unwrap();

    // ADK: a product block opens with <item> <code>
    pub static ref ADK_BLOCK_START: Regex = Regex::new(
        r"^(?P<item>\d{1,3})\s+(?P<code>[A-Za-z0-9\-/]+)"
    ).unwrap();

    pub static ref ADK_CODE: Regex = Regex::new(r"^[A-Za-z0-9\-/]+$").unwrap();

    // Merged-cell rows of French invoices:
    // 001 N300501 /N3005 POMPE N3005-BOITE 360,00 O 9,54 3 434,40
    pub static ref FRENCH_MERGED_LINE: Regex = Regex::new(
        r"^(\d{3})\s+([A-Z0-9]+)\s+/([A-Z0-9]+)\s+(.+?)\s+([\d\s,.]+?)\s+([A-Z])\s+([\d,.]+)\s+([\d\s,.]+)$"
    ).unwrap();

    // pdf font artefacts such as (cid:160)
    pub static ref CID_ARTEFACT: Regex = Regex::new(r"\(cid:\d+\)").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}
