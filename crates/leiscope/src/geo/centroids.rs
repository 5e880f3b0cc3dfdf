//! Reference centroids for ISO 3166-1 alpha-2 country codes.
//!
//! Coordinates are approximate geographic centres, good enough to place one
//! marker per country on a world map.

use super::LatLon;

const CENTROIDS: &[(&str, f64, f64)] = &[
  ("AD", 42.546245, 1.601554),
  ("AE", 23.424076, 53.847818),
  ("AF", 33.93911, 67.709953),
  ("AG", 17.060816, -61.796428),
  ("AI", 18.220554, -63.068615),
  ("AL", 41.153332, 20.168331),
  ("AM", 40.069099, 45.038189),
  ("AO", -11.202692, 17.873887),
  ("AR", -38.416097, -63.616672),
  ("AT", 47.516231, 14.550072),
  ("AU", -25.274398, 133.775136),
  ("AW", 12.52111, -69.968338),
  ("AZ", 40.143105, 47.576927),
  ("BA", 43.915886, 17.679076),
  ("BB", 13.193887, -59.543198),
  ("BD", 23.684994, 90.356331),
  ("BE", 50.503887, 4.469936),
  ("BG", 42.733883, 25.48583),
  ("BH", 25.930414, 50.637772),
  ("BM", 32.321384, -64.75737),
  ("BN", 4.535277, 114.727669),
  ("BO", -16.290154, -63.588653),
  ("BR", -14.235004, -51.92528),
  ("BS", 25.03428, -77.39628),
  ("BW", -22.328474, 24.684866),
  ("BY", 53.709807, 27.953389),
  ("BZ", 17.189877, -88.49765),
  ("CA", 56.130366, -106.346771),
  ("CH", 46.818188, 8.227512),
  ("CI", 7.539989, -5.54708),
  ("CL", -35.675147, -71.542969),
  ("CM", 7.369722, 12.354722),
  ("CN", 35.86166, 104.195397),
  ("CO", 4.570868, -74.297333),
  ("CR", 9.748917, -83.753428),
  ("CW", 12.16957, -68.990021),
  ("CY", 35.126413, 33.429859),
  ("CZ", 49.817492, 15.472962),
  ("DE", 51.165691, 10.451526),
  ("DK", 56.26392, 9.501785),
  ("DO", 18.735693, -70.162651),
  ("DZ", 28.033886, 1.659626),
  ("EC", -1.831239, -78.183406),
  ("EE", 58.595272, 25.013607),
  ("EG", 26.820553, 30.802498),
  ("ES", 40.463667, -3.74922),
  ("ET", 9.145, 40.489673),
  ("FI", 61.92411, 25.748151),
  ("FR", 46.227638, 2.213749),
  ("GB", 55.378051, -3.435973),
  ("GE", 42.315407, 43.356892),
  ("GG", 49.465691, -2.585278),
  ("GH", 7.946527, -1.023194),
  ("GI", 36.137741, -5.345374),
  ("GR", 39.074208, 21.824312),
  ("GT", 15.783471, -90.230759),
  ("HK", 22.396428, 114.109497),
  ("HN", 15.199999, -86.241905),
  ("HR", 45.1, 15.2),
  ("HU", 47.162494, 19.503304),
  ("ID", -0.789275, 113.921327),
  ("IE", 53.41291, -8.24389),
  ("IL", 31.046051, 34.851612),
  ("IM", 54.236107, -4.548056),
  ("IN", 20.593684, 78.96288),
  ("IQ", 33.223191, 43.679291),
  ("IR", 32.427908, 53.688046),
  ("IS", 64.963051, -19.020835),
  ("IT", 41.87194, 12.56738),
  ("JE", 49.214439, -2.13125),
  ("JM", 18.109581, -77.297508),
  ("JO", 30.585164, 36.238414),
  ("JP", 36.204824, 138.252924),
  ("KE", -0.023559, 37.906193),
  ("KR", 35.907757, 127.766922),
  ("KW", 29.31166, 47.481766),
  ("KY", 19.513469, -80.566956),
  ("KZ", 48.019573, 66.923684),
  ("LB", 33.854721, 35.862285),
  ("LI", 47.166, 9.555373),
  ("LK", 7.873054, 80.771797),
  ("LT", 55.169438, 23.881275),
  ("LU", 49.815273, 6.129583),
  ("LV", 56.879635, 24.603189),
  ("MA", 31.791702, -7.09262),
  ("MC", 43.750298, 7.412841),
  ("MD", 47.411631, 28.369885),
  ("ME", 42.708678, 19.37439),
  ("MK", 41.608635, 21.745275),
  ("MT", 35.937496, 14.375416),
  ("MU", -20.348404, 57.552152),
  ("MX", 23.634501, -102.552784),
  ("MY", 4.210484, 101.975766),
  ("NG", 9.081999, 8.675277),
  ("NL", 52.132633, 5.291266),
  ("NO", 60.472024, 8.468946),
  ("NZ", -40.900557, 174.885971),
  ("OM", 21.512583, 55.923255),
  ("PA", 8.537981, -80.782127),
  ("PE", -9.189967, -75.015152),
  ("PH", 12.879721, 121.774017),
  ("PK", 30.375321, 69.345116),
  ("PL", 51.919438, 19.145136),
  ("PR", 18.220833, -66.590149),
  ("PT", 39.399872, -8.224454),
  ("PY", -23.442503, -58.443832),
  ("QA", 25.354826, 51.183884),
  ("RO", 45.943161, 24.96676),
  ("RS", 44.016521, 21.005859),
  ("RU", 61.52401, 105.318756),
  ("SA", 23.885942, 45.079162),
  ("SC", -4.679574, 55.491977),
  ("SE", 60.128161, 18.643501),
  ("SG", 1.352083, 103.819836),
  ("SI", 46.151241, 14.995463),
  ("SK", 48.669026, 19.699024),
  ("SM", 43.94236, 12.457777),
  ("TH", 15.870032, 100.992541),
  ("TN", 33.886917, 9.537499),
  ("TR", 38.963745, 35.243322),
  ("TT", 10.691803, -61.222503),
  ("TW", 23.69781, 120.960515),
  ("TZ", -6.369028, 34.888822),
  ("UA", 48.379433, 31.16558),
  ("UG", 1.373333, 32.290275),
  ("US", 37.09024, -95.712891),
  ("UY", -32.522779, -55.765835),
  ("UZ", 41.377491, 64.585262),
  ("VE", 6.42375, -66.58973),
  ("VG", 18.420695, -64.639968),
  ("VN", 14.058324, 108.277199),
  ("ZA", -30.559482, 22.937506),
  ("ZM", -13.133897, 27.849332),
  ("ZW", -19.015438, 29.154857),
];

/// Look up a normalised (upper-case) country code.
pub fn lookup(code: &str) -> Option<LatLon> {
  CENTROIDS
    .binary_search_by(|(c, _, _)| (*c).cmp(code))
    .ok()
    .map(|i| LatLon::new(CENTROIDS[i].1, CENTROIDS[i].2))
}
