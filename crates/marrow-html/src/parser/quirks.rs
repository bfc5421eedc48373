//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
//!
//! Deciding the document's quirks mode from its DOCTYPE.

use marrow_dom::DocumentMode;

/// "The public identifier starts with: ..." (quirks mode).
const QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// "The public identifier is set to: ..." (quirks mode).
const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// "The system identifier is set to: ..." (quirks mode).
const QUIRKS_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// Public identifier prefixes that mean quirks without a system identifier
/// and limited quirks with one.
const HTML4_FRAMESET_TRANSITIONAL_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// "The public identifier starts with: ..." (limited-quirks mode).
const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

/// The fields of a DOCTYPE token the mode decision looks at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DoctypeFields<'a> {
    pub name: Option<&'a str>,
    pub public_identifier: Option<&'a str>,
    pub system_identifier: Option<&'a str>,
    pub force_quirks: bool,
}

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
pub(crate) fn is_conforming(doctype: &DoctypeFields<'_>) -> bool {
    doctype.name == Some("html")
        && doctype.public_identifier.is_none()
        && doctype
            .system_identifier
            .is_none_or(|system| system == "about:legacy-compat")
}

/// The document mode a DOCTYPE puts the document in.
pub(crate) fn document_mode(doctype: &DoctypeFields<'_>) -> DocumentMode {
    // Comparisons are ASCII case-insensitive.
    let public = doctype.public_identifier.map(str::to_ascii_lowercase);
    let system = doctype.system_identifier.map(str::to_ascii_lowercase);
    let public_starts_with =
        |prefixes: &[&str]| public.as_deref().is_some_and(|id| prefixes.iter().any(|p| id.starts_with(p)));

    // "Then, if the document is not an iframe srcdoc document, and the parser
    // cannot change the mode flag is false, and the DOCTYPE token matches one
    // of the conditions in the following list, then set the Document to
    // quirks mode:"
    let quirks = doctype.force_quirks
        || doctype.name != Some("html")
        || public
            .as_deref()
            .is_some_and(|id| QUIRKS_PUBLIC_IDS.contains(&id))
        || system.as_deref() == Some(QUIRKS_SYSTEM_ID)
        || public_starts_with(QUIRKS_PUBLIC_ID_PREFIXES)
        || (system.is_none() && public_starts_with(HTML4_FRAMESET_TRANSITIONAL_PREFIXES));
    if quirks {
        return DocumentMode::Quirks;
    }

    // "Otherwise, if the document is not an iframe srcdoc document, and the
    // parser cannot change the mode flag is false, and the DOCTYPE token
    // matches one of the conditions in the following list, then then set the
    // Document to limited-quirks mode:"
    let limited = public_starts_with(LIMITED_QUIRKS_PUBLIC_ID_PREFIXES)
        || (system.is_some() && public_starts_with(HTML4_FRAMESET_TRANSITIONAL_PREFIXES));
    if limited {
        DocumentMode::LimitedQuirks
    } else {
        DocumentMode::NoQuirks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype<'a>(
        name: Option<&'a str>,
        public_identifier: Option<&'a str>,
        system_identifier: Option<&'a str>,
    ) -> DoctypeFields<'a> {
        DoctypeFields {
            name,
            public_identifier,
            system_identifier,
            force_quirks: false,
        }
    }

    #[test]
    fn html5_doctype_is_no_quirks() {
        let html5 = doctype(Some("html"), None, None);
        assert!(is_conforming(&html5));
        assert_eq!(document_mode(&html5), DocumentMode::NoQuirks);
    }

    #[test]
    fn legacy_compat_is_conforming() {
        let legacy = doctype(Some("html"), None, Some("about:legacy-compat"));
        assert!(is_conforming(&legacy));
    }

    #[test]
    fn html4_transitional_depends_on_system_identifier() {
        let public = Some("-//W3C//DTD HTML 4.01 Transitional//EN");
        assert_eq!(
            document_mode(&doctype(Some("html"), public, None)),
            DocumentMode::Quirks
        );
        assert_eq!(
            document_mode(&doctype(
                Some("html"),
                public,
                Some("http://www.w3.org/TR/html4/loose.dtd")
            )),
            DocumentMode::LimitedQuirks
        );
    }

    #[test]
    fn xhtml_transitional_is_limited_quirks() {
        let xhtml = doctype(
            Some("html"),
            Some("-//W3C//DTD XHTML 1.0 Transitional//EN"),
            Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"),
        );
        assert!(!is_conforming(&xhtml));
        assert_eq!(document_mode(&xhtml), DocumentMode::LimitedQuirks);
    }

    #[test]
    fn force_quirks_and_missing_name() {
        let mut forced = doctype(Some("html"), None, None);
        forced.force_quirks = true;
        assert_eq!(document_mode(&forced), DocumentMode::Quirks);
        assert_eq!(document_mode(&doctype(None, None, None)), DocumentMode::Quirks);
    }
}
