//! Rule-based recommendations for a community profile. No AI call involved;
//! this is the curated catalog the platform falls back on.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

pub fn recommendations_for(community_type: &str) -> Vec<Recommendation> {
    match community_type {
        "farmer" => vec![
            Recommendation {
                icon: "🌾",
                title: "PM-KISAN Scheme",
                description: "Direct income support of ₹6000 per year for farmers",
                category: "Government Scheme",
            },
            Recommendation {
                icon: "🚜",
                title: "e-NAM Market Access",
                description: "Connect your farm produce to national markets for better pricing",
                category: "Market Access",
            },
            Recommendation {
                icon: "📚",
                title: "Modern Farming Techniques",
                description: "Learn about sustainable and efficient farming methods",
                category: "Education",
            },
        ],
        "student" => vec![
            Recommendation {
                icon: "🎓",
                title: "Scholarship Programs",
                description: "Explore various scholarship opportunities for students",
                category: "Education",
            },
            Recommendation {
                icon: "💼",
                title: "Skill Development Courses",
                description: "Free courses to enhance your employability",
                category: "Learning",
            },
        ],
        "business" => vec![
            Recommendation {
                icon: "💰",
                title: "MUDRA Loan Scheme",
                description: "Loans up to ₹10 lakhs for small businesses",
                category: "Government Scheme",
            },
            Recommendation {
                icon: "📈",
                title: "ONDC Marketplace",
                description: "Sell your products digitally across India through ONDC",
                category: "Market Access",
            },
            Recommendation {
                icon: "📊",
                title: "Business Management Course",
                description: "Learn essential business and financial management skills",
                category: "Learning",
            },
        ],
        _ => vec![
            Recommendation {
                icon: "🏥",
                title: "Ayushman Bharat",
                description: "Free health insurance coverage up to ₹5 lakhs",
                category: "Healthcare",
            },
            Recommendation {
                icon: "💻",
                title: "Digital Literacy Program",
                description: "Learn basic computer and internet skills",
                category: "Education",
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farmer_catalog_has_scheme_entries() {
        let recs = recommendations_for("farmer");
        assert_eq!(recs.len(), 3);
        assert!(recs.iter().any(|r| r.category == "Government Scheme"));
    }

    #[test]
    fn unknown_type_gets_general_catalog() {
        let recs = recommendations_for("fisher");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "Ayushman Bharat");
    }
}
