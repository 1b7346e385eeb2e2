//! RDF Vocabulary Constants and Well-Known Namespaces
//!
//! This crate provides a centralized location for the vocabulary IRIs used by
//! the rdfweave parsers and generators.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `owl` - OWL vocabulary (http://www.w3.org/2002/07/owl#)
//! - `dc`, `dcterms`, `foaf`, `skos`, `geo` - common metadata vocabularies
//! - `namespaces` - the prefix table used to seed the default namespace context

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:XMLLiteral IRI
    pub const XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

    /// rdf:first IRI (RDF list head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (RDF list tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil IRI (RDF list terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    /// rdf:Statement IRI (reified statement class)
    pub const STATEMENT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Statement";

    /// rdf:subject IRI
    pub const SUBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject";

    /// rdf:predicate IRI
    pub const PREDICATE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate";

    /// rdf:object IRI
    pub const OBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#object";

    /// rdf:Description local name (RDF/XML node element)
    pub const DESCRIPTION: &str = "Description";

    /// rdf:RDF local name (RDF/XML root element)
    pub const RDF: &str = "RDF";

    /// rdf:li local name (container membership shorthand)
    pub const LI: &str = "li";

    /// Build a container membership property IRI (`rdf:_n`)
    pub fn member(n: usize) -> String {
        format!("{}_{}", NS, n)
    }
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// RDFS namespace IRI
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    /// rdfs:seeAlso IRI
    pub const SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:short IRI
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";

    /// xsd:byte IRI
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";

    /// xsd:unsignedLong IRI
    pub const UNSIGNED_LONG: &str = "http://www.w3.org/2001/XMLSchema#unsignedLong";

    /// xsd:unsignedInt IRI
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";

    /// xsd:unsignedShort IRI
    pub const UNSIGNED_SHORT: &str = "http://www.w3.org/2001/XMLSchema#unsignedShort";

    /// xsd:unsignedByte IRI
    pub const UNSIGNED_BYTE: &str = "http://www.w3.org/2001/XMLSchema#unsignedByte";

    /// xsd:nonNegativeInteger IRI
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";

    /// xsd:positiveInteger IRI
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";

    /// xsd:nonPositiveInteger IRI
    pub const NON_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonPositiveInteger";

    /// xsd:negativeInteger IRI
    pub const NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#negativeInteger";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:float IRI
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:gYear IRI
    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";

    /// xsd:anyURI IRI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// Check if a datatype IRI is an integer-family type
    #[inline]
    pub fn is_integer_family(datatype_iri: &str) -> bool {
        matches!(
            datatype_iri,
            INTEGER
                | LONG
                | INT
                | SHORT
                | BYTE
                | UNSIGNED_LONG
                | UNSIGNED_INT
                | UNSIGNED_SHORT
                | UNSIGNED_BYTE
                | NON_NEGATIVE_INTEGER
                | POSITIVE_INTEGER
                | NON_POSITIVE_INTEGER
                | NEGATIVE_INTEGER
        )
    }

    /// Check if a datatype IRI is a numeric type
    #[inline]
    pub fn is_numeric_datatype(datatype_iri: &str) -> bool {
        is_integer_family(datatype_iri) || matches!(datatype_iri, DECIMAL | FLOAT | DOUBLE)
    }

    /// Check if a datatype IRI carries a value that renders as a bare number
    ///
    /// This is the numeric family plus `xsd:gYear`, whose lexical form is an
    /// integer year.
    #[inline]
    pub fn is_number_like(datatype_iri: &str) -> bool {
        is_numeric_datatype(datatype_iri) || datatype_iri == G_YEAR
    }

    /// Get the local name portion of a datatype IRI (e.g., "integer" from xsd:integer)
    #[inline]
    pub fn datatype_local_name(datatype_iri: &str) -> Option<&str> {
        datatype_iri.rsplit('#').next()
    }
}

/// OWL vocabulary constants
pub mod owl {
    /// OWL namespace IRI
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";

    /// owl:sameAs IRI
    pub const SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
}

/// XML namespace (for `xml:lang` / `xml:base` attributes)
pub mod xml {
    /// XML namespace IRI
    pub const NS: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Dublin Core elements
pub mod dc {
    /// Dublin Core elements 1.1 namespace
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";

    /// dc:creator IRI
    pub const CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";

    /// dc:date IRI
    pub const DATE: &str = "http://purl.org/dc/elements/1.1/date";

    /// dc:title IRI
    pub const TITLE: &str = "http://purl.org/dc/elements/1.1/title";
}

/// Dublin Core terms
pub mod dcterms {
    /// DCMI terms namespace
    pub const NS: &str = "http://purl.org/dc/terms/";
}

/// Friend of a Friend
pub mod foaf {
    /// FOAF namespace
    pub const NS: &str = "http://xmlns.com/foaf/0.1/";

    /// foaf:name IRI
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";

    /// foaf:knows IRI
    pub const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
}

/// SKOS
pub mod skos {
    /// SKOS namespace
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";
}

/// W3C Basic Geo
pub mod geo {
    /// WGS84 geo positioning namespace
    pub const NS: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";
}

/// Well-known prefix table
pub mod namespaces {
    /// Prefix/namespace pairs that seed the default namespace context,
    /// in registration order.
    pub const WELL_KNOWN: &[(&str, &str)] = &[
        ("rdf", super::rdf::NS),
        ("rdfs", super::rdfs::NS),
        ("owl", super::owl::NS),
        ("xsd", super::xsd::NS),
        ("dc", super::dc::NS),
        ("dcterms", super::dcterms::NS),
        ("foaf", super::foaf::NS),
        ("skos", super::skos::NS),
        ("geo", super::geo::NS),
    ];

    /// Look up a well-known namespace by prefix
    pub fn lookup(prefix: &str) -> Option<&'static str> {
        WELL_KNOWN
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, ns)| *ns)
    }
}
